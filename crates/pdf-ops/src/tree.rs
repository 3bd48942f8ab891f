//! Page tree helpers shared by merge, reorder and rotate

use crate::error::PdfOpsError;
use lopdf::{Document, Object, ObjectId};
use std::collections::HashSet;

/// Attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

pub(crate) fn load(bytes: &[u8]) -> Result<Document, PdfOpsError> {
    Document::load_mem(bytes).map_err(|e| PdfOpsError::ParseError(e.to_string()))
}

pub(crate) fn save(mut doc: Document) -> Result<Vec<u8>, PdfOpsError> {
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfOpsError::OperationError(format!("Failed to save PDF: {}", e)))?;
    Ok(buffer)
}

/// Object id of the root `Pages` node
pub(crate) fn pages_root(doc: &Document) -> Result<ObjectId, PdfOpsError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfOpsError::OperationError("No Root in trailer".into()))?;

    doc.get_dictionary(catalog_id)
        .map_err(|_| PdfOpsError::OperationError("Invalid catalog".into()))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| PdfOpsError::OperationError("No Pages in catalog".into()))
}

/// Copy inherited attributes onto the page itself so it can be re-parented
pub(crate) fn flatten_inherited(doc: &mut Document, page_id: ObjectId) -> Result<(), PdfOpsError> {
    let mut inherited = Vec::new();

    {
        let page = doc
            .get_dictionary(page_id)
            .map_err(|_| PdfOpsError::OperationError("Invalid page dictionary".into()))?;

        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            let mut visited = HashSet::new();
            let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
            while let Some(parent_id) = parent {
                if !visited.insert(parent_id) {
                    return Err(PdfOpsError::ParseError(format!(
                        "Page tree loops back to object {} {}",
                        parent_id.0, parent_id.1
                    )));
                }
                let Ok(node) = doc.get_dictionary(parent_id) else {
                    break;
                };
                if let Ok(value) = node.get(key) {
                    inherited.push((key.to_vec(), value.clone()));
                    break;
                }
                parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            }
        }
    }

    let page = doc
        .get_dictionary_mut(page_id)
        .map_err(|_| PdfOpsError::OperationError("Invalid page dictionary".into()))?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    Ok(())
}

/// Replace the root `Kids` with `page_refs`, pointing every page at the root
pub(crate) fn update_page_tree(
    doc: &mut Document,
    pages_id: ObjectId,
    page_refs: &[ObjectId],
) -> Result<(), PdfOpsError> {
    for &page_id in page_refs {
        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            page.set("Parent", Object::Reference(pages_id));
        }
    }

    if let Some(Object::Dictionary(ref mut pages_dict)) = doc.objects.get_mut(&pages_id) {
        let kids = page_refs
            .iter()
            .map(|&id| Object::Reference(id))
            .collect::<Vec<_>>();
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", Object::Integer(page_refs.len() as i64));
    } else {
        return Err(PdfOpsError::OperationError(
            "Invalid pages dictionary".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_flatten_stops_on_parent_cycle() {
        let mut doc = Document::with_version("1.7");
        let a: ObjectId = (10, 0);
        let b: ObjectId = (11, 0);
        let page: ObjectId = (12, 0);
        doc.objects.insert(
            a,
            Object::Dictionary(dictionary! { "Type" => "Pages", "Parent" => b }),
        );
        doc.objects.insert(
            b,
            Object::Dictionary(dictionary! { "Type" => "Pages", "Parent" => a }),
        );
        doc.objects.insert(
            page,
            Object::Dictionary(dictionary! { "Type" => "Page", "Parent" => a }),
        );

        assert!(matches!(
            flatten_inherited(&mut doc, page),
            Err(PdfOpsError::ParseError(_))
        ));
    }

    #[test]
    fn test_flatten_copies_attribute_from_ancestor() {
        let mut doc = Document::with_version("1.7");
        let root: ObjectId = (10, 0);
        let page: ObjectId = (11, 0);
        doc.objects.insert(
            root,
            Object::Dictionary(dictionary! { "Type" => "Pages", "Rotate" => Object::Integer(180) }),
        );
        doc.objects.insert(
            page,
            Object::Dictionary(dictionary! { "Type" => "Page", "Parent" => root }),
        );

        flatten_inherited(&mut doc, page).unwrap();
        let rotate = doc.get_dictionary(page).unwrap().get(b"Rotate").unwrap();
        assert_eq!(rotate.as_i64().unwrap(), 180);
    }
}
