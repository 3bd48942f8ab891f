//! Word output: one paragraph per line block, page breaks between pages

use crate::chunk::{Chunk, LINE_SEPARATOR};
use crate::error::TranslateError;
use docx_rs::{BreakType, Docx, Paragraph, Run};
use std::io::Cursor;

pub fn build_docx(chunks: &[Chunk]) -> Result<Vec<u8>, TranslateError> {
    let mut docx = Docx::new();

    for chunk in chunks {
        match chunk {
            Chunk::Text(text) => {
                for block in text.split(LINE_SEPARATOR).map(str::trim).filter(|b| !b.is_empty()) {
                    docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(block)));
                }
            }
            Chunk::PageBreak => {
                docx = docx.add_paragraph(
                    Paragraph::new().add_run(Run::new().add_break(BreakType::Page)),
                );
            }
            Chunk::Blank => {}
        }
    }

    let mut out = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut out)
        .map_err(|e| TranslateError::Document(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_is_zip_container() {
        let bytes = build_docx(&[
            Chunk::Text("Hello\n\nWorld".into()),
            Chunk::PageBreak,
            Chunk::Text("Page two".into()),
        ])
        .unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
