//! PDF inspection: page count, version and basic metadata

use crate::error::PdfOpsError;
use crate::tree::load;
use lopdf::Document;
use serde::Serialize;

/// PDF file information extracted from an upload
#[derive(Debug, Clone, Serialize, Default)]
pub struct PdfInfo {
    /// Number of pages in the document
    pub page_count: u32,
    /// PDF version string (e.g., "1.7")
    pub version: String,
    /// Whether the document is encrypted
    pub encrypted: bool,
    /// File size in bytes
    pub size_bytes: usize,
    /// Document title from metadata (if available)
    pub title: Option<String>,
    /// Document author from metadata (if available)
    pub author: Option<String>,
}

/// Validate a PDF file and extract basic info
pub fn inspect(bytes: &[u8]) -> Result<PdfInfo, PdfOpsError> {
    if !bytes.starts_with(b"%PDF-") {
        return Err(PdfOpsError::ParseError(
            "Not a valid PDF file (missing %PDF- header)".into(),
        ));
    }

    let document = load(bytes)?;
    let page_count = document.get_pages().len() as u32;
    if page_count == 0 {
        return Err(PdfOpsError::ParseError("PDF has no pages".into()));
    }

    Ok(PdfInfo {
        page_count,
        version: document.version.clone(),
        encrypted: document.is_encrypted(),
        size_bytes: bytes.len(),
        title: info_string(&document, b"Title"),
        author: info_string(&document, b"Author"),
    })
}

fn info_string(document: &Document, key: &[u8]) -> Option<String> {
    let info_id = document.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let value = document.get_dictionary(info_id).ok()?.get(key).ok()?;
    let decoded = String::from_utf8_lossy(value.as_str().ok()?).into_owned();
    (!decoded.is_empty()).then_some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_pdf;

    #[test]
    fn test_inspect_reports_pages_and_version() {
        let pdf = create_test_pdf(3, "Info");
        let info = inspect(&pdf).unwrap();
        assert_eq!(info.page_count, 3);
        assert_eq!(info.version, "1.7");
        assert!(!info.encrypted);
        assert_eq!(info.size_bytes, pdf.len());
        assert_eq!(info.title, None);
    }

    #[test]
    fn test_inspect_rejects_missing_header() {
        assert!(matches!(
            inspect(b"hello world"),
            Err(PdfOpsError::ParseError(_))
        ));
    }
}
