use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Translation service failed or answered with something unusable
    #[error("Translation service error: {0}")]
    Upstream(String),

    #[error("Failed to build Word document: {0}")]
    Document(String),
}
