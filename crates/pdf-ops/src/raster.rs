//! PDF -> PNG rendering through poppler
//!
//! Rendering shells out to `pdftoppm` via the `pdf2image` crate. When the
//! `raster` feature is disabled, or poppler is not installed, every call
//! fails with `MissingDependency` before the upload is touched.

use crate::error::PdfOpsError;

/// Resolution bounds accepted by `render_pages`
pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 600;
pub const DEFAULT_DPI: u32 = 150;

/// Render every page to PNG, named `page_<n>.png`
#[cfg(feature = "raster")]
pub fn render_pages(bytes: &[u8], dpi: u32) -> Result<Vec<(String, Vec<u8>)>, PdfOpsError> {
    use image::{ImageFormat, RgbaImage};
    use pdf2image::{Pages, RenderOptionsBuilder, DPI};
    use std::io::Cursor;

    if !(MIN_DPI..=MAX_DPI).contains(&dpi) {
        return Err(PdfOpsError::InvalidInput(format!(
            "DPI must be between {} and {}",
            MIN_DPI, MAX_DPI
        )));
    }
    ensure_poppler()?;

    let pdf = pdf2image::PDF::from_bytes(bytes.to_vec())
        .map_err(|e| PdfOpsError::ParseError(e.to_string()))?;
    let page_count = pdf.page_count();
    if page_count == 0 {
        return Err(PdfOpsError::ParseError("PDF has no pages".into()));
    }

    let mut builder = RenderOptionsBuilder::default();
    builder.resolution(DPI::Uniform(dpi));
    let options = builder
        .build()
        .map_err(|e| PdfOpsError::OperationError(e.to_string()))?;

    let rendered = pdf
        .render(Pages::Range(1..=page_count), options)
        .map_err(|e| PdfOpsError::OperationError(format!("Rendering failed: {}", e)))?;

    rendered
        .into_iter()
        .enumerate()
        .map(|(i, page)| {
            // Re-wrap the pixels so encoding goes through this crate's image version
            let rgba = page.to_rgba8();
            let (width, height) = rgba.dimensions();
            let buffer = RgbaImage::from_raw(width, height, rgba.into_raw()).ok_or_else(|| {
                PdfOpsError::ImageError(format!("Page {} has an invalid pixel buffer", i + 1))
            })?;

            let mut out = Cursor::new(Vec::new());
            buffer
                .write_to(&mut out, ImageFormat::Png)
                .map_err(|e| PdfOpsError::ImageError(e.to_string()))?;
            Ok((format!("page_{}.png", i + 1), out.into_inner()))
        })
        .collect()
}

#[cfg(not(feature = "raster"))]
pub fn render_pages(_bytes: &[u8], _dpi: u32) -> Result<Vec<(String, Vec<u8>)>, PdfOpsError> {
    Err(PdfOpsError::MissingDependency(
        "PDF rendering was not compiled in (enable the `raster` feature)".into(),
    ))
}

/// Fail fast when poppler's `pdftoppm` is not on the PATH
#[cfg(feature = "raster")]
fn ensure_poppler() -> Result<(), PdfOpsError> {
    match std::process::Command::new("pdftoppm").arg("-v").output() {
        Ok(_) => Ok(()),
        Err(e) => Err(PdfOpsError::MissingDependency(format!(
            "poppler (pdftoppm) is required for PDF -> image: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rejects_bad_dpi_or_missing_poppler() {
        let result = render_pages(b"%PDF-1.7", 10);
        assert!(matches!(
            result,
            Err(PdfOpsError::InvalidInput(_)) | Err(PdfOpsError::MissingDependency(_))
        ));
    }
}
