//! PDF text translation into Word documents
//!
//! Page texts are chunked (`chunk_pages`), sent one chunk at a time through
//! a [`Translator`] with a fixed pause between requests, and written out as
//! `.docx` with a page break per source page.

pub mod chunk;
pub mod client;
pub mod docx;
pub mod error;
pub mod pipeline;

pub use chunk::{chunk_pages, Chunk, CHUNK_LIMIT};
pub use client::{GoogleTranslator, Translator, DEFAULT_ENDPOINT};
pub use docx::build_docx;
pub use error::TranslateError;
pub use pipeline::{translate_chunks, translate_pages_to_docx, TranslateOptions, DEFAULT_DELAY};
