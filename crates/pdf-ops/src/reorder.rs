//! Page reordering and deletion
//!
//! The output contains exactly the pages listed in `order`, in that order.
//! Pages that are not listed are dropped; pages listed twice are duplicated.

use crate::error::PdfOpsError;
use crate::tree::{flatten_inherited, load, pages_root, save, update_page_tree};
use std::collections::HashSet;
use tracing::debug;

/// Rebuild a PDF with the pages in `order` (1-indexed)
pub fn reorder_pages(bytes: &[u8], order: &[u32]) -> Result<Vec<u8>, PdfOpsError> {
    if order.is_empty() {
        return Err(PdfOpsError::InvalidRange("No pages specified".into()));
    }

    let mut doc = load(bytes)?;
    let pages = doc.get_pages();
    let page_count = pages.len() as u32;

    if let Some(bad) = order.iter().find(|&&p| p < 1 || p > page_count) {
        return Err(PdfOpsError::InvalidRange(format!(
            "Page {} does not exist (document has {} pages)",
            bad, page_count
        )));
    }

    let pages_id = pages_root(&doc)?;

    // Inherited attributes must be copied before any page is re-parented
    for page_id in pages.values() {
        flatten_inherited(&mut doc, *page_id)?;
    }

    let mut used = HashSet::new();
    let mut page_refs = Vec::with_capacity(order.len());
    for number in order {
        let page_id = pages[number];
        if used.insert(page_id) {
            page_refs.push(page_id);
        } else {
            // A page object can only have one parent, so repeats get a copy
            let copy = doc
                .get_object(page_id)
                .map_err(|e| PdfOpsError::OperationError(e.to_string()))?
                .clone();
            page_refs.push(doc.add_object(copy));
        }
    }

    update_page_tree(&mut doc, pages_id, &page_refs)?;
    doc.prune_objects();

    debug!(before = page_count, after = page_refs.len(), "reordered pages");
    save(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_nested_test_pdf, create_test_pdf, page_attribute, page_marker};
    use lopdf::Document;
    use pretty_assertions::assert_eq;

    fn markers(bytes: &[u8]) -> Vec<String> {
        let count = Document::load_mem(bytes).unwrap().get_pages().len() as u32;
        (1..=count).map(|n| page_marker(bytes, n)).collect()
    }

    #[test]
    fn test_reorder_reverses_pages() {
        let pdf = create_test_pdf(3, "R");
        let result = reorder_pages(&pdf, &[3, 2, 1]).unwrap();
        assert_eq!(markers(&result), vec!["R-3", "R-2", "R-1"]);
    }

    #[test]
    fn test_reorder_drops_unlisted_pages() {
        let pdf = create_test_pdf(4, "R");
        let result = reorder_pages(&pdf, &[4, 2]).unwrap();
        assert_eq!(markers(&result), vec!["R-4", "R-2"]);
    }

    #[test]
    fn test_reorder_duplicates_pages() {
        let pdf = create_test_pdf(2, "R");
        let result = reorder_pages(&pdf, &[1, 1, 2]).unwrap();
        assert_eq!(markers(&result), vec!["R-1", "R-1", "R-2"]);
    }

    #[test]
    fn test_reorder_rejects_out_of_range() {
        let pdf = create_test_pdf(2, "R");
        assert!(matches!(
            reorder_pages(&pdf, &[1, 3]),
            Err(PdfOpsError::InvalidRange(_))
        ));
        assert!(reorder_pages(&pdf, &[0]).is_err());
    }

    #[test]
    fn test_reorder_rejects_empty_order() {
        let pdf = create_test_pdf(2, "R");
        assert!(reorder_pages(&pdf, &[]).is_err());
    }

    #[test]
    fn test_reorder_keeps_inherited_attributes() {
        let pdf = create_nested_test_pdf(3, "N");
        let result = reorder_pages(&pdf, &[2, 1]).unwrap();

        assert_eq!(markers(&result), vec!["N-2", "N-1"]);
        assert_eq!(page_attribute(&result, 1, b"Rotate"), Some(90));
        assert_eq!(page_attribute(&result, 2, b"Rotate"), Some(90));
    }
}
