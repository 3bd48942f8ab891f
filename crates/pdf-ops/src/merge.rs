//! PDF Merge algorithm
//!
//! Combines multiple PDFs into a single document, pages in upload order.

use crate::error::PdfOpsError;
use crate::tree::{flatten_inherited, load, pages_root, save, update_page_tree};
use lopdf::{Object, ObjectId};
use tracing::debug;

/// Merge PDFs into one, pages in the given order.
///
/// The first document is the destination; every other document's objects
/// are imported with ids shifted past the destination's highest id. A single
/// document is returned untouched.
pub fn merge_documents(documents: Vec<Vec<u8>>) -> Result<Vec<u8>, PdfOpsError> {
    let mut documents = documents.into_iter();
    let Some(first) = documents.next() else {
        return Err(PdfOpsError::InvalidInput("No documents to merge".into()));
    };

    let rest: Vec<Vec<u8>> = documents.collect();
    if rest.is_empty() {
        return Ok(first);
    }

    // Load all documents first so a broken upload fails before any work
    let mut dest = load(&first)
        .map_err(|e| PdfOpsError::ParseError(format!("Failed to load document 0: {}", e)))?;
    let mut sources = Vec::with_capacity(rest.len());
    for (i, doc_bytes) in rest.iter().enumerate() {
        let doc = load(doc_bytes).map_err(|e| {
            PdfOpsError::ParseError(format!("Failed to load document {}: {}", i + 1, e))
        })?;
        sources.push(doc);
    }

    let pages_id = pages_root(&dest)?;
    let mut dest_max_id = dest.max_id;
    let mut dest_page_refs = get_page_references(&dest);

    for source in sources {
        let offset = dest_max_id;
        dest_page_refs.extend(
            get_page_references(&source)
                .into_iter()
                .map(|(num, generation)| (num + offset, generation)),
        );

        for ((num, generation), mut object) in source.objects {
            shift_refs(&mut object, offset);
            dest.objects.insert((num + offset, generation), object);
        }
        dest_max_id = dest_max_id.max(source.max_id + offset);
    }
    dest.max_id = dest_max_id;

    for &page_id in &dest_page_refs {
        flatten_inherited(&mut dest, page_id)?;
    }
    update_page_tree(&mut dest, pages_id, &dest_page_refs)?;
    dest.prune_objects();

    debug!(pages = dest_page_refs.len(), "merged documents");
    save(dest)
}

/// Get all page object references from a document, in page order
fn get_page_references(doc: &lopdf::Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Shift every reference inside `obj` by `offset`, in place
fn shift_refs(obj: &mut Object, offset: u32) {
    match obj {
        Object::Reference(id) => id.0 += offset,
        Object::Array(items) => items.iter_mut().for_each(|o| shift_refs(o, offset)),
        Object::Dictionary(dict) => dict.iter_mut().for_each(|(_, v)| shift_refs(v, offset)),
        Object::Stream(stream) => stream
            .dict
            .iter_mut()
            .for_each(|(_, v)| shift_refs(v, offset)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_nested_test_pdf, create_test_pdf, page_attribute, page_marker};
    use lopdf::Document;

    #[test]
    fn test_merge_empty_fails() {
        let result = merge_documents(vec![]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No documents to merge"));
    }

    #[test]
    fn test_merge_single_document_returns_same() {
        let pdf = create_test_pdf(2, "Single");
        let result = merge_documents(vec![pdf.clone()]).unwrap();
        assert_eq!(result, pdf);
    }

    #[test]
    fn test_merge_two_documents_combines_pages() {
        let doc_a = create_test_pdf(2, "DocA");
        let doc_b = create_test_pdf(3, "DocB");

        let merged = merge_documents(vec![doc_a, doc_b]).unwrap();

        let doc = Document::load_mem(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 5, "Merged document should have 5 pages");
    }

    #[test]
    fn test_merge_preserves_page_order() {
        let doc1 = create_test_pdf(2, "First");
        let doc2 = create_test_pdf(1, "Second");
        let doc3 = create_test_pdf(2, "Third");

        let merged = merge_documents(vec![doc1, doc2, doc3]).unwrap();

        let markers: Vec<String> = (1..=5).map(|n| page_marker(&merged, n)).collect();
        assert_eq!(
            markers,
            vec!["First-1", "First-2", "Second-1", "Third-1", "Third-2"]
        );
    }

    #[test]
    fn test_merge_handles_different_sizes() {
        let doc1 = create_test_pdf(10, "Large");
        let doc2 = create_test_pdf(1, "Small");
        let doc3 = create_test_pdf(5, "Medium");

        let merged = merge_documents(vec![doc1, doc2, doc3]).unwrap();

        let doc = Document::load_mem(&merged).unwrap();
        assert_eq!(doc.get_pages().len(), 16, "Merged document should have 16 pages");
    }

    #[test]
    fn test_merge_keeps_inherited_attributes() {
        let flat = create_test_pdf(1, "Flat");
        let nested = create_nested_test_pdf(2, "Nested");

        let merged = merge_documents(vec![flat, nested]).unwrap();

        assert_eq!(page_attribute(&merged, 1, b"Rotate"), None);
        assert_eq!(page_attribute(&merged, 2, b"Rotate"), Some(90));
        assert_eq!(page_attribute(&merged, 3, b"Rotate"), Some(90));
    }

    #[test]
    fn test_merge_rejects_broken_input() {
        let good = create_test_pdf(1, "Good");
        let result = merge_documents(vec![good, b"garbage".to_vec()]);
        assert!(matches!(result, Err(PdfOpsError::ParseError(_))));
    }
}
