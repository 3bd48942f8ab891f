//! Page texts -> translated chunks -> `.docx`

use crate::chunk::{chunk_pages, is_blank, Chunk, CHUNK_LIMIT};
use crate::client::Translator;
use crate::docx::build_docx;
use crate::error::TranslateError;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct TranslateOptions {
    pub source: String,
    pub target: String,
    /// Pause before every translated chunk except the first
    pub delay: Duration,
    pub chunk_limit: usize,
}

impl TranslateOptions {
    pub fn new(source: &str, target: &str) -> Result<Self, TranslateError> {
        let source = source.trim();
        let target = target.trim();
        if target.is_empty() || target.eq_ignore_ascii_case("auto") {
            return Err(TranslateError::InvalidInput(
                "Target language must be an ISO code such as en, ja or fr".into(),
            ));
        }
        let valid = |code: &str| code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid(source) || !valid(target) {
            return Err(TranslateError::InvalidInput(format!(
                "Invalid language code '{}' -> '{}'",
                source, target
            )));
        }

        Ok(TranslateOptions {
            source: if source.is_empty() { "auto".into() } else { source.to_string() },
            target: target.to_string(),
            delay: DEFAULT_DELAY,
            chunk_limit: CHUNK_LIMIT,
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Output file name, `translated_to_<target>.docx`
    pub fn file_name(&self) -> String {
        format!("translated_to_{}.docx", self.target)
    }
}

/// Translate text chunks one after another; blanks and page breaks pass through.
///
/// The first failure aborts the run; nothing is retried.
pub async fn translate_chunks(
    chunks: Vec<Chunk>,
    translator: &dyn Translator,
    options: &TranslateOptions,
) -> Result<Vec<Chunk>, TranslateError> {
    let total = chunks.iter().filter(|c| c.is_translatable()).count();
    let mut translated = Vec::with_capacity(chunks.len());

    for (i, chunk) in chunks.into_iter().enumerate() {
        let Chunk::Text(text) = chunk else {
            translated.push(chunk);
            continue;
        };

        if i > 0 && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
        debug!(chunk = i, chars = text.chars().count(), "translating chunk");
        let result = translator
            .translate(&text, &options.source, &options.target)
            .await?;
        translated.push(Chunk::Text(result.trim().to_string()));
    }

    info!(chunks = total, target = %options.target, "translation complete");
    Ok(translated)
}

/// Full pipeline over page texts. Returns `.docx` bytes.
pub async fn translate_pages_to_docx<S: AsRef<str>>(
    pages: &[S],
    translator: &dyn Translator,
    options: &TranslateOptions,
) -> Result<Vec<u8>, TranslateError> {
    let chunks = chunk_pages(pages, options.chunk_limit);
    if is_blank(&chunks) {
        return Err(TranslateError::InvalidInput(
            "No text could be extracted from the PDF".into(),
        ));
    }

    let translated = translate_chunks(chunks, translator, options).await?;
    build_docx(&translated)
}
