//! Error types for the toolkit server

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use batch_core::BatchError;
use image_ops::ImageOpsError;
use pdf_ops::PdfOpsError;
use qr_core::QrError;
use serde::Serialize;
use thiserror::Error;
use translate_core::TranslateError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("{0}")]
    Schema(String),

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("No uploaded file matched any mapping row ({} identifiers unmatched)", .0.len())]
    NothingMatched(Vec<String>),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    unmatched: Option<Vec<String>>,
}

impl ServerError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::MissingDependency(_) => (StatusCode::NOT_IMPLEMENTED, "MISSING_DEPENDENCY"),
            ServerError::Schema(_) => (StatusCode::UNPROCESSABLE_ENTITY, "SCHEMA_ERROR"),
            ServerError::Decode(_) => (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_ERROR"),
            ServerError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ServerError::NothingMatched(_) => (StatusCode::UNPROCESSABLE_ENTITY, "NOTHING_MATCHED"),
            ServerError::Parse(_) => (StatusCode::UNPROCESSABLE_ENTITY, "PARSE_ERROR"),
            ServerError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        } else {
            tracing::debug!(code, error = %self, "request rejected");
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
            // Single-operator tool: the raw error is shown as-is
            detail: format!("{:?}", self),
            unmatched: match self {
                ServerError::NothingMatched(ids) => Some(ids),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<PdfOpsError> for ServerError {
    fn from(err: PdfOpsError) -> Self {
        let message = err.to_string();
        match err {
            PdfOpsError::ParseError(_) | PdfOpsError::ImageError(_) => ServerError::Parse(message),
            PdfOpsError::InvalidRange(_) | PdfOpsError::InvalidInput(_) => {
                ServerError::Validation(message)
            }
            PdfOpsError::MissingDependency(what) => ServerError::MissingDependency(what),
            PdfOpsError::OperationError(_) => ServerError::Internal(message),
        }
    }
}

impl From<BatchError> for ServerError {
    fn from(err: BatchError) -> Self {
        let message = err.to_string();
        match err {
            BatchError::SchemaError(_) => ServerError::Schema(message),
            BatchError::DecodeError(_) => ServerError::Decode(message),
            BatchError::ValidationError(_) => ServerError::Validation(message),
            BatchError::ParseError { .. } | BatchError::ArchiveError(_) => ServerError::Parse(message),
            BatchError::ExportError(_) => ServerError::Internal(message),
        }
    }
}

impl From<ImageOpsError> for ServerError {
    fn from(err: ImageOpsError) -> Self {
        let message = err.to_string();
        match err {
            ImageOpsError::DecodeError(_) => ServerError::Parse(message),
            ImageOpsError::InvalidInput(_) => ServerError::Validation(message),
            ImageOpsError::EncodeError(_) => ServerError::Internal(message),
        }
    }
}

impl From<QrError> for ServerError {
    fn from(err: QrError) -> Self {
        let message = err.to_string();
        match err {
            // Data too long for the chosen level is a user input problem
            QrError::ValidationError(_) | QrError::EncodeError(_) => ServerError::Validation(message),
            QrError::ImageError(_) => ServerError::Parse(message),
        }
    }
}

impl From<TranslateError> for ServerError {
    fn from(err: TranslateError) -> Self {
        let message = err.to_string();
        match err {
            TranslateError::InvalidInput(_) => ServerError::Validation(message),
            TranslateError::Upstream(_) => ServerError::Upstream(message),
            TranslateError::Document(_) => ServerError::Internal(message),
        }
    }
}

impl From<MultipartError> for ServerError {
    fn from(err: MultipartError) -> Self {
        ServerError::Validation(format!("Invalid multipart form: {}", err.body_text()))
    }
}
