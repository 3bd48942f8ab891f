//! Page rotation

use crate::error::PdfOpsError;
use crate::tree::{flatten_inherited, load, save};
use lopdf::Object;

/// Rotate pages clockwise by `angle` degrees (a multiple of 90).
///
/// The angle is added to any rotation the page already has. When `pages`
/// is empty every page is rotated.
pub fn rotate_pages(bytes: &[u8], angle: i64, pages: &[u32]) -> Result<Vec<u8>, PdfOpsError> {
    if angle % 90 != 0 {
        return Err(PdfOpsError::InvalidInput(format!(
            "Rotation must be a multiple of 90 degrees, got {}",
            angle
        )));
    }

    let turn = angle.rem_euclid(360);

    let mut doc = load(bytes)?;
    let all_pages = doc.get_pages();
    let page_count = all_pages.len() as u32;

    let targets: Vec<u32> = if pages.is_empty() {
        (1..=page_count).collect()
    } else {
        pages.to_vec()
    };

    for number in targets {
        let page_id = *all_pages.get(&number).ok_or_else(|| {
            PdfOpsError::InvalidRange(format!(
                "Page {} does not exist (document has {} pages)",
                number, page_count
            ))
        })?;

        flatten_inherited(&mut doc, page_id)?;
        let page = doc
            .get_dictionary_mut(page_id)
            .map_err(|_| PdfOpsError::OperationError("Invalid page dictionary".into()))?;
        let current = page
            .get(b"Rotate")
            .and_then(Object::as_i64)
            .unwrap_or(0)
            .rem_euclid(360);
        page.set("Rotate", Object::Integer((current + turn).rem_euclid(360)));
    }

    save(doc)
}
