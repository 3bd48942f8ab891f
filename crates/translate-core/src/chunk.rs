//! Splitting extracted page text into translation-sized chunks

/// Characters per request accepted by the public translate endpoint
pub const CHUNK_LIMIT: usize = 4500;

/// Separator between lines inside one text chunk; each becomes a paragraph
pub const LINE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Lines joined by [`LINE_SEPARATOR`], sent for translation
    Text(String),
    /// A blank source line; not sent
    Blank,
    /// End of a PDF page; not sent
    PageBreak,
}

impl Chunk {
    pub fn is_translatable(&self) -> bool {
        matches!(self, Chunk::Text(_))
    }
}

/// Chunk the text of each page, in order, with a page break after every page.
///
/// Lines are packed greedily so a text chunk never exceeds `limit`
/// characters unless a single line is longer on its own.
pub fn chunk_pages<S: AsRef<str>>(pages: &[S], limit: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    let flush = |chunks: &mut Vec<Chunk>, current: &mut String, current_len: &mut usize| {
        if !current.is_empty() {
            chunks.push(Chunk::Text(std::mem::take(current)));
            *current_len = 0;
        }
    };

    for page in pages {
        for line in page.as_ref().lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                flush(&mut chunks, &mut current, &mut current_len);
                chunks.push(Chunk::Blank);
                continue;
            }

            let line_len = line.chars().count();
            let joined_len = if current.is_empty() {
                line_len
            } else {
                current_len + LINE_SEPARATOR.len() + line_len
            };
            if joined_len > limit {
                flush(&mut chunks, &mut current, &mut current_len);
            }

            if !current.is_empty() {
                current.push_str(LINE_SEPARATOR);
                current_len += LINE_SEPARATOR.len();
            }
            current.push_str(line);
            current_len += line_len;
        }
        flush(&mut chunks, &mut current, &mut current_len);
        chunks.push(Chunk::PageBreak);
    }

    chunks
}

/// True when no chunk carries any text
pub fn is_blank(chunks: &[Chunk]) -> bool {
    !chunks.iter().any(Chunk::is_translatable)
}
