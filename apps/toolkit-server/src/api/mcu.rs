//! MCU (medical check-up) result tools

use super::{blocking, read_table, routed_zip, source_files};
use crate::download::{attachment, XLSX};
use crate::error::ServerError;
use crate::upload::Form;
use axum::{
    extract::Multipart,
    response::{IntoResponse, Response},
    Json,
};
use batch_core::{status_summary, table_to_xlsx, Mapping};
use tracing::info;

/// POST /api/mcu/organize
///
/// Places result files into `department/role/` or `target_folder/`
/// depending on which columns the mapping table has.
pub async fn handle_organize(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let table = read_table(&form.require_file("mapping")?)?;
    let files = source_files(form.require_files("files")?);

    blocking(move || {
        let mapping = Mapping::for_organize(&table)?;
        info!(mode = ?mapping.mode, rows = mapping.rows.len(), files = files.len(), "organising files");
        routed_zip(&mapping, &files, "mcu_structured.zip")
    })
    .await
}

/// POST /api/mcu/status-summary
///
/// `format=json` (default) answers with the counts, `format=xlsx` with a
/// two-column workbook.
pub async fn handle_status_summary(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let table = read_table(&form.require_file("table")?)?;
    let column = form.text("column").map(str::to_string);
    let as_xlsx = match form.text("format").unwrap_or("json").to_lowercase().as_str() {
        "json" => false,
        "xlsx" => true,
        other => {
            return Err(ServerError::Validation(format!(
                "Unknown format '{}' (expected json or xlsx)",
                other
            )))
        }
    };

    let summary = status_summary(&table, column.as_deref())?;
    info!(column = %summary.column, statuses = summary.counts.len(), rows = summary.total_rows, "status summary");

    if as_xlsx {
        let workbook = blocking(move || Ok(table_to_xlsx(&summary.to_table())?)).await?;
        Ok(attachment("status_agregat.xlsx", XLSX, workbook))
    } else {
        Ok(Json(summary).into_response())
    }
}
