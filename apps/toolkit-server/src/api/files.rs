//! Generic file tools

use super::{blocking, file_pairs, read_table};
use crate::download::{attachment, zip_attachment, XLSX};
use crate::error::ServerError;
use crate::upload::Form;
use axum::{extract::Multipart, response::Response};
use batch_core::{archive, table_to_xlsx};
use tracing::info;

/// POST /api/files/zip
pub async fn handle_zip(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let files = file_pairs(form.require_files("files")?);
    info!(files = files.len(), "zipping uploads");
    blocking(move || zip_attachment("compressed_files.zip", files)).await
}

/// POST /api/files/unzip
///
/// Answers with the archive's files, directories dropped, repacked flat.
pub async fn handle_unzip(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;

    blocking(move || {
        let entries = archive::unpack(&file.bytes)?;
        info!(archive = %file.name, entries = entries.len(), "extracted archive");
        zip_attachment("extracted_content.zip", entries)
    })
    .await
}

/// POST /api/files/to-excel
///
/// CSV, TXT, JSON or spreadsheet in, `.xlsx` out.
pub async fn handle_to_excel(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let file = form.require_file("file")?;

    let workbook = blocking(move || {
        let table = read_table(&file)?;
        Ok(table_to_xlsx(&table)?)
    })
    .await?;
    Ok(attachment("converted_file.xlsx", XLSX, workbook))
}
