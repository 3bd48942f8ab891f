//! File download responses and batch report headers

use crate::error::ServerError;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use image_ops::ItemFailure;
use serde::Serialize;

pub const PDF: &str = "application/pdf";
pub const ZIP: &str = "application/zip";
pub const PNG: &str = "image/png";
pub const TEXT: &str = "text/plain; charset=utf-8";
pub const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const PLACED_COUNT: HeaderName = HeaderName::from_static("x-placed-count");
pub const UNMATCHED_COUNT: HeaderName = HeaderName::from_static("x-unmatched-count");
pub const SKIPPED_COUNT: HeaderName = HeaderName::from_static("x-skipped-count");
pub const BATCH_REPORT: HeaderName = HeaderName::from_static("x-batch-report");

/// `bytes` as a download called `file_name`
pub fn attachment(file_name: &str, content_type: &'static str, bytes: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        file_name.replace('"', "")
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

/// Pack `entries` and answer with the archive
pub fn zip_attachment<I, N, B>(file_name: &str, entries: I) -> Result<Response, ServerError>
where
    I: IntoIterator<Item = (N, B)>,
    N: AsRef<str>,
    B: AsRef<[u8]>,
{
    let archive = batch_core::archive::pack(entries)?;
    Ok(attachment(file_name, ZIP, archive))
}

/// What a batch left out: rows with no file and files that failed
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub unmatched: Vec<String>,
    pub skipped: Vec<ItemFailure>,
}

impl BatchReport {
    /// Attach the report to a download as `x-*` headers
    pub fn apply(&self, placed: usize, mut response: Response) -> Result<Response, ServerError> {
        let json = serde_json::to_vec(self)
            .map_err(|e| ServerError::Internal(format!("Failed to encode batch report: {}", e)))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(json);

        let headers = response.headers_mut();
        headers.insert(PLACED_COUNT, HeaderValue::from(placed));
        headers.insert(UNMATCHED_COUNT, HeaderValue::from(self.unmatched.len()));
        headers.insert(SKIPPED_COUNT, HeaderValue::from(self.skipped.len()));
        headers.insert(
            BATCH_REPORT,
            HeaderValue::from_str(&encoded)
                .map_err(|e| ServerError::Internal(format!("Invalid report header: {}", e)))?,
        );
        Ok(response)
    }
}
