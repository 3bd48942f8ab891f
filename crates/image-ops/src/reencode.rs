//! Re-encoding and sequential renaming

use crate::batch::BatchOutcome;
use crate::compress::encode_jpeg;
use crate::error::ImageOpsError;
use batch_core::{sequential_names, split_extension};
use image::ImageFormat;
use std::io::Cursor;
use std::str::FromStr;

const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Keep the original bytes and extension
    #[default]
    Same,
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// Extension for converted output; `None` keeps the original one
    pub fn extension(self) -> Option<&'static str> {
        match self {
            OutputFormat::Same => None,
            OutputFormat::Jpeg => Some("jpg"),
            OutputFormat::Png => Some("png"),
            OutputFormat::Webp => Some("webp"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ImageOpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "same" | "original" => Ok(OutputFormat::Same),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            other => Err(ImageOpsError::InvalidInput(format!(
                "Unknown output format '{}' (expected same, jpg, png or webp)",
                other
            ))),
        }
    }
}

/// Convert an image to `format`. JPEG uses quality 95; WebP is lossless.
pub fn reencode(bytes: &[u8], format: OutputFormat) -> Result<Vec<u8>, ImageOpsError> {
    let img = image::load_from_memory(bytes)?;
    match format {
        OutputFormat::Same => Ok(bytes.to_vec()),
        OutputFormat::Jpeg => encode_jpeg(&img, JPEG_QUALITY),
        OutputFormat::Png => write(&img, ImageFormat::Png),
        OutputFormat::Webp => write(&webp_compatible(img), ImageFormat::WebP),
    }
}

fn write(img: &image::DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ImageOpsError> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format)
        .map_err(|e| ImageOpsError::EncodeError(e.to_string()))?;
    Ok(out.into_inner())
}

/// The WebP encoder only takes 8-bit RGB(A)
fn webp_compatible(img: image::DynamicImage) -> image::DynamicImage {
    if img.color().has_alpha() {
        image::DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

/// Rename to `prefix_NNN.ext` in input order, converting when `format` asks.
///
/// Numbers follow input position, so a skipped file leaves a gap.
pub fn rename_sequential(
    files: &[(String, Vec<u8>)],
    prefix: &str,
    start: u32,
    format: OutputFormat,
) -> Result<BatchOutcome, ImageOpsError> {
    let names = sequential_names(
        prefix,
        start,
        files
            .iter()
            .map(|(name, _)| format.extension().or(split_extension(name).1)),
    )
    .map_err(|e| ImageOpsError::InvalidInput(e.to_string()))?;

    let mut outcome = BatchOutcome::default();
    for ((original, bytes), new_name) in files.iter().zip(names) {
        match reencode(bytes, format) {
            Ok(out) => outcome.push_ok(new_name, out),
            Err(e) => outcome.push_failure(original, e),
        }
    }
    Ok(outcome)
}
