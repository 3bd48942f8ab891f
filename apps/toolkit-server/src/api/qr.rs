//! QR code tools

use super::{blocking, read_table};
use crate::download::{attachment, zip_attachment, PNG};
use crate::error::ServerError;
use crate::upload::Form;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    response::Response,
    Json,
};
use chrono::Utc;
use qr_core::{
    batch::DEFAULT_PREFIX, batch_qr, parse_hex_color, render_png, ErrorCorrection, QrHistoryEntry,
    QrPayload, QrStyle, TEMPLATES,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

fn timestamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Style fields of the QR form, each falling back to the default
fn read_style(form: &Form) -> Result<QrStyle, ServerError> {
    let defaults = QrStyle::default();
    let ErrorCorrection(error_correction) = form.parse_or("error_correction", ErrorCorrection::default())?;

    let style = QrStyle {
        error_correction,
        box_size: form.parse_or("box_size", defaults.box_size)?,
        border: form.parse_or("border", defaults.border)?,
        dark: form
            .text("fill_color")
            .map(parse_hex_color)
            .transpose()?
            .unwrap_or(defaults.dark),
        light: form
            .text("back_color")
            .map(parse_hex_color)
            .transpose()?
            .unwrap_or(defaults.light),
        logo_percent: form.parse_or("logo_size", defaults.logo_percent)?,
    };
    style.validate()?;
    Ok(style)
}

fn read_session(form: &Form) -> Result<Option<Uuid>, ServerError> {
    form.text("session")
        .map(|raw| {
            raw.parse()
                .map_err(|_| ServerError::Validation(format!("Invalid session id '{}'", raw)))
        })
        .transpose()
}

/// POST /api/qr
///
/// `type` picks the payload template and its fields (see [`QrPayload`]).
/// Without `type`, the session's selected template payload is encoded.
/// With `session`, the result is added to that session's history.
pub async fn handle_generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let session = read_session(&form)?;
    let style = read_style(&form)?;
    let logo = form.take_file("logo").map(|f| f.bytes);

    let (data, kind) = match form.text("type") {
        Some(kind) => {
            let payload = QrPayload::from_fields(kind, &form.fields())?;
            (payload.encode()?, payload.label().to_string())
        }
        None => {
            let template = match session {
                Some(id) => state
                    .sessions
                    .with_session(id, |s| s.template_data.clone())
                    .await
                    .ok_or_else(|| ServerError::NotFound(format!("Session {} not found", id)))?,
                None => None,
            };
            let data = template.ok_or_else(|| {
                ServerError::Validation("Missing field 'type' and no template selected".into())
            })?;
            (data, "Template".to_string())
        }
    };

    let png = {
        let data = data.clone();
        blocking(move || Ok(render_png(&data, &style, logo.as_deref())?)).await?
    };
    info!(kind = %kind, chars = data.chars().count(), bytes = png.len(), "QR generated");

    if let Some(id) = session {
        let entry = QrHistoryEntry {
            image_png: png.clone(),
            data,
            kind,
            created_at: Utc::now(),
        };
        state
            .sessions
            .with_session(id, move |s| s.qr_history.push(entry))
            .await
            .ok_or_else(|| ServerError::NotFound(format!("Session {} not found", id)))?;
    }

    Ok(attachment(&format!("qrcode_{}.png", timestamp()), PNG, png))
}

/// POST /api/qr/batch
///
/// One PNG per row of `data_column`, named from `name_column` or the row number.
pub async fn handle_batch(multipart: Multipart) -> Result<Response, ServerError> {
    let mut form = Form::read(multipart).await?;
    let table = read_table(&form.require_file("table")?)?;
    let data_column = form.require_text("data_column")?.to_string();
    let name_column = form.text("name_column").map(str::to_string);
    let prefix = form.text("prefix").unwrap_or(DEFAULT_PREFIX).to_string();

    blocking(move || {
        let codes = batch_qr(&table, &data_column, name_column.as_deref(), &prefix)?;
        zip_attachment(&format!("batch_qr_{}.zip", timestamp()), codes)
    })
    .await
}

#[derive(Serialize)]
pub struct TemplateItem {
    pub index: usize,
    pub name: &'static str,
    pub payload: &'static str,
}

/// GET /api/qr/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateItem>> {
    Json(
        TEMPLATES
            .iter()
            .enumerate()
            .map(|(index, t)| TemplateItem {
                index,
                name: t.name,
                payload: t.payload,
            })
            .collect(),
    )
}
