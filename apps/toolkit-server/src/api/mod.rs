//! HTTP handlers, one module per tool group

pub mod files;
pub mod images;
pub mod mcu;
pub mod pdf;
pub mod qr;
pub mod sessions;

use crate::download::{zip_attachment, BatchReport};
use crate::error::ServerError;
use crate::upload::UploadedFile;
use axum::{
    response::{Html, Response},
    Json,
};
use batch_core::{route, Mapping, SourceFile, Table};
use serde::Serialize;
use tracing::info;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "toolkit-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// Run CPU-bound work off the async executor
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, ServerError>
where
    F: FnOnce() -> Result<T, ServerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServerError::Internal(format!("Worker task failed: {}", e)))?
}

pub(crate) fn read_table(file: &UploadedFile) -> Result<Table, ServerError> {
    Ok(Table::from_upload(&file.name, &file.bytes)?)
}

pub(crate) fn source_files(files: Vec<UploadedFile>) -> Vec<SourceFile> {
    files
        .into_iter()
        .map(|f| SourceFile::new(f.name, f.bytes))
        .collect()
}

pub(crate) fn file_pairs(files: Vec<UploadedFile>) -> Vec<(String, Vec<u8>)> {
    files.into_iter().map(UploadedFile::into_pair).collect()
}

/// Route `files` by `mapping` and answer with the placed files as a ZIP.
///
/// Placing nothing is an error listing every unmatched identifier.
pub(crate) fn routed_zip(
    mapping: &Mapping,
    files: &[SourceFile],
    file_name: &str,
) -> Result<Response, ServerError> {
    let result = route(mapping, files);
    info!(
        rows = mapping.rows.len(),
        placed = result.placed.len(),
        unmatched = result.unmatched.len(),
        "mapping routed"
    );
    if result.placed.is_empty() {
        return Err(ServerError::NothingMatched(result.unmatched));
    }

    let placed = result.placed.len();
    let report = BatchReport {
        unmatched: result.unmatched,
        skipped: Vec::new(),
    };
    report.apply(placed, zip_attachment(file_name, result.placed.into_entries())?)
}
