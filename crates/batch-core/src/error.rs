use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    /// Uploaded table lacks the required columns
    #[error("Missing required columns: {0}")]
    SchemaError(String),

    /// Text upload is not valid UTF-8
    #[error("Could not decode {0}: the file is not valid UTF-8, re-save as UTF-8 (\"CSV UTF-8\" or a workbook) and try again")]
    DecodeError(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// Upload could not be parsed in its declared format
    #[error("Failed to parse {name}: {reason}")]
    ParseError { name: String, reason: String },

    #[error("Archive operation failed: {0}")]
    ArchiveError(String),

    #[error("Spreadsheet export failed: {0}")]
    ExportError(String),
}

impl BatchError {
    pub(crate) fn parse(name: &str, reason: impl ToString) -> Self {
        BatchError::ParseError {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
