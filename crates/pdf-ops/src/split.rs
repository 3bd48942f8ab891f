//! PDF Split algorithm
//!
//! Extracts pages from a PDF using "Construction by Whitelist".

use crate::error::PdfOpsError;
use crate::tree::{load, save};
use lopdf::Document;
use std::collections::HashSet;

/// Split a PDF, extracting only the specified pages (1-indexed)
///
/// Uses "Construction by Whitelist" algorithm:
/// 1. Identify target page objects
/// 2. Delete every other page
/// 3. Prune objects no longer reachable from the trailer
/// 4. Rebuild page tree
pub fn split_document(bytes: &[u8], pages: Vec<u32>) -> Result<Vec<u8>, PdfOpsError> {
    let doc = load(bytes)?;
    extract_pages(&doc, &pages)
}

/// Split a PDF into single-page documents named `page_<n>.pdf`
pub fn split_into_pages(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>, PdfOpsError> {
    let doc = load(bytes)?;
    let page_count = doc.get_pages().len() as u32;

    (1..=page_count)
        .map(|page| Ok((format!("page_{}.pdf", page), extract_pages(&doc, &[page])?)))
        .collect()
}

fn extract_pages(doc: &Document, pages: &[u32]) -> Result<Vec<u8>, PdfOpsError> {
    if pages.is_empty() {
        return Err(PdfOpsError::InvalidRange("No pages specified".into()));
    }

    // Validate page numbers are > 0
    if pages.contains(&0) {
        return Err(PdfOpsError::InvalidRange(
            "Page numbers must be >= 1".into(),
        ));
    }

    let page_count = doc.get_pages().len() as u32;

    // Validate all page numbers exist
    for &page in pages {
        if page > page_count {
            return Err(PdfOpsError::InvalidRange(format!(
                "Page {} does not exist (document has {} pages)",
                page, page_count
            )));
        }
    }

    let mut new_doc = doc.clone();

    let pages_to_keep: HashSet<u32> = pages.iter().copied().collect();
    let mut pages_to_delete: Vec<u32> = (1..=page_count)
        .filter(|p| !pages_to_keep.contains(p))
        .collect();

    // Delete unwanted pages (must delete in reverse order to maintain indices)
    pages_to_delete.reverse();
    for page_num in pages_to_delete {
        new_doc.delete_pages(&[page_num]);
    }

    new_doc.prune_objects();
    save(new_doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_pdf, page_marker};
    use lopdf::Document;

    #[test]
    fn test_split_empty_pages_fails() {
        let pdf = create_test_pdf(5, "P");
        let result = split_document(&pdf, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_split_extracts_single_page() {
        let pdf = create_test_pdf(5, "P");
        let result = split_document(&pdf, vec![1]).unwrap();
        let doc = Document::load_mem(&result).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_split_extracts_multiple_pages() {
        let pdf = create_test_pdf(5, "P");
        let result = split_document(&pdf, vec![1, 3, 5]).unwrap();
        assert_eq!(page_marker(&result, 1), "P-1");
        assert_eq!(page_marker(&result, 2), "P-3");
        assert_eq!(page_marker(&result, 3), "P-5");
    }

    #[test]
    fn test_split_invalid_page_number_fails() {
        let pdf = create_test_pdf(5, "P");
        let result = split_document(&pdf, vec![10]); // Page 10 doesn't exist
        assert!(result.is_err());
    }

    #[test]
    fn test_split_page_zero_fails() {
        let pdf = create_test_pdf(5, "P");
        let result = split_document(&pdf, vec![0]); // Pages are 1-indexed
        assert!(result.is_err());
    }

    #[test]
    fn test_split_into_pages_names_each_page() {
        let pdf = create_test_pdf(3, "Doc");
        let parts = split_into_pages(&pdf).unwrap();

        let names: Vec<&str> = parts.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["page_1.pdf", "page_2.pdf", "page_3.pdf"]);

        for (i, (_, bytes)) in parts.iter().enumerate() {
            let doc = Document::load_mem(bytes).unwrap();
            assert_eq!(doc.get_pages().len(), 1);
            assert_eq!(page_marker(bytes, 1), format!("Doc-{}", i + 1));
        }
    }
}
