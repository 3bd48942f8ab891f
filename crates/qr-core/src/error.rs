use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrError {
    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("QR encoding failed: {0}")]
    EncodeError(String),

    #[error("Image processing failed: {0}")]
    ImageError(String),
}

impl From<qrcode::types::QrError> for QrError {
    fn from(e: qrcode::types::QrError) -> Self {
        QrError::EncodeError(e.to_string())
    }
}

impl From<image::ImageError> for QrError {
    fn from(e: image::ImageError) -> Self {
        QrError::ImageError(e.to_string())
    }
}
