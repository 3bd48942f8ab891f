//! Text extraction using pdf-extract
//! Handles CID fonts and ToUnicode CMaps properly

use crate::error::PdfOpsError;
use crate::tree::load;
use crate::split::split_document;
use tracing::warn;

/// Extract the text of every page, one string per page.
///
/// A page whose text cannot be extracted yields an empty string.
pub fn extract_page_texts(bytes: &[u8]) -> Result<Vec<String>, PdfOpsError> {
    let page_count = load(bytes)?.get_pages().len() as u32;

    let mut texts = Vec::with_capacity(page_count as usize);
    for page in 1..=page_count {
        let single = split_document(bytes, vec![page])?;
        match pdf_extract::extract_text_from_mem(&single) {
            Ok(text) => texts.push(text),
            Err(e) => {
                warn!(page, error = %e, "text extraction failed, using empty page");
                texts.push(String::new());
            }
        }
    }
    Ok(texts)
}

/// Extract all text with a `--- Page N ---` header before each page
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfOpsError> {
    let blocks: Vec<String> = extract_page_texts(bytes)?
        .into_iter()
        .enumerate()
        .map(|(i, text)| format!("--- Page {} ---\n{}", i + 1, text))
        .collect();
    Ok(blocks.join("\n"))
}
