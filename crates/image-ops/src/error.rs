use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageOpsError {
    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<image::ImageError> for ImageOpsError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Encoding(_) => ImageOpsError::EncodeError(e.to_string()),
            other => ImageOpsError::DecodeError(other.to_string()),
        }
    }
}
