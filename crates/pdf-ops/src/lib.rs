//! PDF operations for the toolkit server
//!
//! Everything here works on in-memory bytes using lopdf:
//! - `merge_documents` / `split_document` / `split_into_pages`
//! - `reorder_pages` / `rotate_pages`
//! - `encrypt_document`
//! - `extract_text` (pdf-extract, one block per page)
//! - `images_to_pdf`
//! - `render_pages` (poppler, behind the `raster` feature)

pub mod encrypt;
pub mod error;
pub mod images;
pub mod info;
pub mod merge;
pub mod raster;
pub mod reorder;
pub mod rotate;
pub mod split;
pub mod text;
mod tree;

#[cfg(test)]
pub(crate) mod test_support;

pub use encrypt::encrypt_document;
pub use error::PdfOpsError;
pub use images::images_to_pdf;
pub use info::{inspect, PdfInfo};
pub use merge::merge_documents;
pub use raster::render_pages;
pub use reorder::reorder_pages;
pub use rotate::rotate_pages;
pub use split::{split_document, split_into_pages};
pub use text::{extract_page_texts, extract_text};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<u32, PdfOpsError> {
    let doc =
        lopdf::Document::load_mem(bytes).map_err(|e| PdfOpsError::ParseError(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}

/// Parse page range string like "1-3, 5, 8-10" into sorted unique page numbers.
///
/// Every page must fall in `1..=page_count`.
pub fn parse_ranges(input: &str, page_count: u32) -> Result<Vec<u32>, PdfOpsError> {
    use std::collections::BTreeSet;

    let mut pages = BTreeSet::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        pages.extend(parse_part(part, page_count)?);
    }

    Ok(pages.into_iter().collect())
}

/// Parse a page order like "3, 1, 2-4" keeping input order and duplicates.
///
/// Every page must fall in `1..=page_count`.
pub fn parse_page_order(input: &str, page_count: u32) -> Result<Vec<u32>, PdfOpsError> {
    let mut order = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        order.extend(parse_part(part, page_count)?);
    }

    if order.is_empty() {
        return Err(PdfOpsError::InvalidRange("No pages specified".into()));
    }

    Ok(order)
}

/// Bounds are checked before a range is expanded.
fn parse_part(part: &str, page_count: u32) -> Result<std::ops::RangeInclusive<u32>, PdfOpsError> {
    let (start, end) = match part.split_once('-') {
        // Range like "1-3"
        Some((start, end)) => {
            let start: u32 = start
                .trim()
                .parse()
                .map_err(|_| PdfOpsError::InvalidRange(format!("Invalid start: {}", start)))?;
            let end: u32 = end
                .trim()
                .parse()
                .map_err(|_| PdfOpsError::InvalidRange(format!("Invalid end: {}", end)))?;

            if start > end {
                return Err(PdfOpsError::InvalidRange(format!(
                    "Start {} > end {}",
                    start, end
                )));
            }
            (start, end)
        }
        // Single page like "5"
        None => {
            let page: u32 = part
                .parse()
                .map_err(|_| PdfOpsError::InvalidRange(format!("Invalid page: {}", part)))?;
            (page, page)
        }
    };

    if let Some(bad) = [start, end].into_iter().find(|&p| p < 1 || p > page_count) {
        return Err(PdfOpsError::InvalidRange(format!(
            "Page {} is outside 1-{}",
            bad, page_count
        )));
    }

    Ok(start..=end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_pdf;
    use proptest::prelude::*;

    #[test]
    fn test_page_count() {
        let pdf = create_test_pdf(4, "Count");
        assert_eq!(get_page_count(&pdf).unwrap(), 4);
    }

    #[test]
    fn test_page_count_rejects_garbage() {
        assert!(matches!(
            get_page_count(b"not a pdf"),
            Err(PdfOpsError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_ranges_single() {
        let result = parse_ranges("5", 10).unwrap();
        assert_eq!(result, vec![5]);
    }

    #[test]
    fn test_parse_ranges_range() {
        let result = parse_ranges("1-3", 10).unwrap();
        assert_eq!(result, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_ranges_complex() {
        let result = parse_ranges("1-3, 5, 8-10", 10).unwrap();
        assert_eq!(result, vec![1, 2, 3, 5, 8, 9, 10]);
    }

    #[test]
    fn test_parse_ranges_deduplicates() {
        let result = parse_ranges("1-3, 2-4", 10).unwrap();
        assert_eq!(result, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_ranges_rejects_pages_past_the_end() {
        assert!(matches!(
            parse_ranges("2, 11", 10),
            Err(PdfOpsError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_ranges("0-2", 10),
            Err(PdfOpsError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_huge_ranges_fail_before_expanding() {
        let started = std::time::Instant::now();
        assert!(matches!(
            parse_page_order("1-4000000000", 3),
            Err(PdfOpsError::InvalidRange(_))
        ));
        assert!(matches!(
            parse_ranges("1-4294967295", 3),
            Err(PdfOpsError::InvalidRange(_))
        ));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_page_order_keeps_order_and_duplicates() {
        let result = parse_page_order("3, 1, 1, 2", 3).unwrap();
        assert_eq!(result, vec![3, 1, 1, 2]);
    }

    #[test]
    fn test_page_order_expands_ranges() {
        let result = parse_page_order("4, 1-3", 4).unwrap();
        assert_eq!(result, vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_page_order_rejects_out_of_bounds() {
        assert!(parse_page_order("0, 1", 3).is_err());
        assert!(parse_page_order("1, 4", 3).is_err());
    }

    #[test]
    fn test_page_order_rejects_text() {
        assert!(parse_page_order("1, two", 3).is_err());
    }

    #[test]
    fn test_page_order_rejects_empty() {
        assert!(parse_page_order(" , ", 3).is_err());
    }

    proptest! {
        #[test]
        fn prop_ranges_sorted_unique_and_complete(
            ranges in prop::collection::vec((1u32..60, 0u32..6), 1..6),
        ) {
            let input = ranges
                .iter()
                .map(|(start, len)| format!("{}-{}", start, start + len))
                .collect::<Vec<_>>()
                .join(", ");
            let pages = parse_ranges(&input, 100).unwrap();

            prop_assert!(pages.windows(2).all(|w| w[0] < w[1]));
            for (start, len) in &ranges {
                for page in *start..=start + len {
                    prop_assert!(pages.contains(&page));
                }
            }
        }
    }
}
