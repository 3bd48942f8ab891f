//! JPEG compression with a bounded longest side

use crate::batch::BatchOutcome;
use crate::error::ImageOpsError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::ops::RangeInclusive;

pub const QUALITY_RANGE: RangeInclusive<u8> = 10..=95;
pub const MAX_SIDE_RANGE: RangeInclusive<u32> = 100..=4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    /// JPEG quality
    pub quality: u8,
    /// Longest side after shrinking, in pixels
    pub max_side: u32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            quality: 75,
            max_side: 1200,
        }
    }
}

impl CompressOptions {
    pub fn new(quality: u8, max_side: u32) -> Result<Self, ImageOpsError> {
        if !QUALITY_RANGE.contains(&quality) {
            return Err(ImageOpsError::InvalidInput(format!(
                "Quality must be between {} and {}",
                QUALITY_RANGE.start(),
                QUALITY_RANGE.end()
            )));
        }
        if !MAX_SIDE_RANGE.contains(&max_side) {
            return Err(ImageOpsError::InvalidInput(format!(
                "Max side must be between {} and {} px",
                MAX_SIDE_RANGE.start(),
                MAX_SIDE_RANGE.end()
            )));
        }
        Ok(CompressOptions { quality, max_side })
    }
}

/// Shrink (never enlarge) to fit `max_side` and encode as JPEG
pub fn compress_image(bytes: &[u8], options: CompressOptions) -> Result<Vec<u8>, ImageOpsError> {
    let mut img = image::load_from_memory(bytes)?;
    if img.width() > options.max_side || img.height() > options.max_side {
        img = img.thumbnail(options.max_side, options.max_side);
    }
    encode_jpeg(&img, options.quality)
}

pub(crate) fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ImageOpsError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))
        .map_err(|e| ImageOpsError::EncodeError(e.to_string()))?;
    Ok(out)
}

/// Compress every file; undecodable files are skipped and reported.
///
/// Outputs are named `compressed_<name>`.
pub fn compress_batch(files: &[(String, Vec<u8>)], options: CompressOptions) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for (name, bytes) in files {
        match compress_image(bytes, options) {
            Ok(jpeg) => outcome.push_ok(format!("compressed_{}", name), jpeg),
            Err(e) => outcome.push_failure(name, e),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::png;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_options_bounds() {
        assert!(CompressOptions::new(75, 1200).is_ok());
        assert!(CompressOptions::new(9, 1200).is_err());
        assert!(CompressOptions::new(96, 1200).is_err());
        assert!(CompressOptions::new(75, 99).is_err());
        assert!(CompressOptions::new(75, 4001).is_err());
    }

    #[test]
    fn test_large_image_shrinks_to_fit() {
        let options = CompressOptions::new(60, 100).unwrap();
        let jpeg = compress_image(&png(400, 200), options).unwrap();
        let out = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((out.width(), out.height()), (100, 50));
        assert_eq!(
            image::guess_format(&jpeg).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_small_image_not_enlarged() {
        let jpeg = compress_image(&png(30, 20), CompressOptions::default()).unwrap();
        let out = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((out.width(), out.height()), (30, 20));
    }

    #[test]
    fn test_batch_records_failures_and_continues() {
        let files = vec![
            ("a.png".to_string(), png(10, 10)),
            ("broken.jpg".to_string(), b"nope".to_vec()),
            ("c.png".to_string(), png(12, 8)),
        ];
        let outcome = compress_batch(&files, CompressOptions::default());

        let names: Vec<&str> = outcome.outputs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["compressed_a.png", "compressed_c.png"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].name, "broken.jpg");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_output_fits_and_never_grows(
            width in 1u32..400,
            height in 1u32..400,
            max_side in 100u32..300,
        ) {
            let options = CompressOptions::new(70, max_side).unwrap();
            let out = compress_image(&png(width, height), options).unwrap();
            let img = image::load_from_memory(&out).unwrap();
            prop_assert!(img.width() <= max_side);
            prop_assert!(img.height() <= max_side);
            prop_assert!(img.width() <= width && img.height() <= height);
        }
    }
}
