//! QR symbol -> styled RGBA PNG

use crate::error::QrError;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const BOX_SIZE_RANGE: RangeInclusive<u32> = 5..=20;
pub const BORDER_RANGE: RangeInclusive<u32> = 2..=10;
pub const LOGO_PERCENT_RANGE: RangeInclusive<u32> = 10..=30;

/// Error-correction level, parsed from `L`, `M`, `Q` or `H`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCorrection(pub EcLevel);

impl Default for ErrorCorrection {
    fn default() -> Self {
        ErrorCorrection(EcLevel::H)
    }
}

impl FromStr for ErrorCorrection {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.trim().to_uppercase().as_str() {
            "" | "H" => EcLevel::H,
            "L" => EcLevel::L,
            "M" => EcLevel::M,
            "Q" => EcLevel::Q,
            other => {
                return Err(QrError::ValidationError(format!(
                    "Unknown error correction level '{}' (expected L, M, Q or H)",
                    other
                )))
            }
        };
        Ok(ErrorCorrection(level))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrStyle {
    pub error_correction: EcLevel,
    /// Pixels per module
    pub box_size: u32,
    /// Quiet zone, in modules
    pub border: u32,
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
    /// Logo width as a percentage of the image width
    pub logo_percent: u32,
}

impl Default for QrStyle {
    fn default() -> Self {
        QrStyle {
            error_correction: EcLevel::H,
            box_size: 10,
            border: 4,
            dark: Rgba([0, 0, 0, 255]),
            light: Rgba([255, 255, 255, 255]),
            logo_percent: 20,
        }
    }
}

impl QrStyle {
    pub fn validate(&self) -> Result<(), QrError> {
        check_range("box_size", self.box_size, &BOX_SIZE_RANGE)?;
        check_range("border", self.border, &BORDER_RANGE)?;
        check_range("logo_size", self.logo_percent, &LOGO_PERCENT_RANGE)
    }
}

fn check_range(name: &str, value: u32, range: &RangeInclusive<u32>) -> Result<(), QrError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(QrError::ValidationError(format!(
            "{} must be between {} and {}",
            name,
            range.start(),
            range.end()
        )))
    }
}

/// Parse `#RRGGBB` (leading `#` optional) into an opaque colour
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>, QrError> {
    let hex = value.trim().trim_start_matches('#');
    let invalid = || QrError::ValidationError(format!("Invalid colour '{}', expected #RRGGBB", value));
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

/// Draw the symbol for `data` with `style`, optionally with a centred logo
pub fn render_qr(data: &str, style: &QrStyle, logo: Option<&[u8]>) -> Result<RgbaImage, QrError> {
    style.validate()?;

    let code = QrCode::with_error_correction_level(data.as_bytes(), style.error_correction)?;
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let side = (modules + 2 * style.border) * style.box_size;
    let mut canvas = RgbaImage::from_pixel(side, side, style.light);

    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = i as u32 % modules;
        let my = i as u32 / modules;
        let x0 = (mx + style.border) * style.box_size;
        let y0 = (my + style.border) * style.box_size;
        for y in y0..y0 + style.box_size {
            for x in x0..x0 + style.box_size {
                canvas.put_pixel(x, y, style.dark);
            }
        }
    }

    if let Some(logo) = logo {
        overlay_logo(&mut canvas, logo, style.logo_percent)?;
    }
    Ok(canvas)
}

fn overlay_logo(canvas: &mut RgbaImage, logo: &[u8], percent: u32) -> Result<(), QrError> {
    let logo = image::load_from_memory(logo)
        .map_err(|e| QrError::ImageError(format!("Logo: {}", e)))?
        .to_rgba8();

    let size = canvas.width() * percent / 100;
    if size == 0 {
        return Ok(());
    }
    let logo = imageops::resize(&logo, size, size, FilterType::Lanczos3);
    let x = (canvas.width() - size) / 2;
    let y = (canvas.height() - size) / 2;
    imageops::overlay(canvas, &logo, x as i64, y as i64);
    Ok(())
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, QrError> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// [`render_qr`] then [`encode_png`]
pub fn render_png(data: &str, style: &QrStyle, logo: Option<&[u8]>) -> Result<Vec<u8>, QrError> {
    encode_png(&render_qr(data, style, logo)?)
}
