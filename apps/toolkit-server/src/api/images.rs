//! Image tools

use super::{blocking, file_pairs, routed_zip, source_files};
use crate::download::{zip_attachment, BatchReport};
use crate::error::ServerError;
use crate::upload::Form;
use axum::{extract::Multipart, response::Response};
use batch_core::{ExtensionPolicy, Mapping};
use image_ops::{compress_batch, rename_sequential, BatchOutcome, CompressOptions, OutputFormat};
use tracing::info;

/// Answer with the outputs of a batch; undecodable inputs go in the report
fn outcome_zip(file_name: &str, outcome: BatchOutcome) -> Result<Response, ServerError> {
    if outcome.outputs.is_empty() {
        let names: Vec<&str> = outcome.failures.iter().map(|f| f.name.as_str()).collect();
        return Err(ServerError::Parse(format!(
            "None of the uploaded images could be processed: {}",
            names.join(", ")
        )));
    }

    let placed = outcome.outputs.len();
    let report = BatchReport {
        unmatched: Vec::new(),
        skipped: outcome.failures,
    };
    report.apply(placed, zip_attachment(file_name, outcome.outputs)?)
}

/// POST /api/images/compress
///
/// `quality` 10-95 (default 75), `max_side` 100-4000 px (default 1200).
pub async fn handle_compress(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let files = file_pairs(form.require_files("files")?);
    let defaults = CompressOptions::default();
    let options = CompressOptions::new(
        form.parse_or("quality", defaults.quality)?,
        form.parse_or("max_side", defaults.max_side)?,
    )?;

    blocking(move || {
        let outcome = compress_batch(&files, options);
        info!(
            compressed = outcome.outputs.len(),
            skipped = outcome.failures.len(),
            quality = options.quality,
            "compressed images"
        );
        outcome_zip("foto_kompres.zip", outcome)
    })
    .await
}

/// POST /api/images/rename/sequential
///
/// `format` is `same` (default), `jpg`, `png` or `webp`.
pub async fn handle_rename_sequential(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let files = file_pairs(form.require_files("files")?);
    let prefix = form.require_text("prefix")?.to_string();
    let start: u32 = form.parse_or("start", batch_core::rename::DEFAULT_START)?;
    let format: OutputFormat = form.text("format").unwrap_or_default().parse()?;

    blocking(move || {
        let outcome = rename_sequential(&files, &prefix, start, format)?;
        outcome_zip("hasil_batch_gambar.zip", outcome)
    })
    .await
}

/// POST /api/images/rename/mapping
///
/// `mapping` holds old/new name columns; the old extension is kept when the
/// new name has none.
pub async fn handle_rename_mapping(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let table = super::read_table(&form.require_file("mapping")?)?;
    let files = source_files(form.require_files("files")?);

    blocking(move || {
        let mapping = Mapping::for_rename(&table, ExtensionPolicy::KeepOriginal)?;
        routed_zip(&mapping, &files, "gambar_renamed_by_excel.zip")
    })
    .await
}
