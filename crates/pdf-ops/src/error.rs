use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfOpsError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Image processing failed: {0}")]
    ImageError(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),
}
