//! Session lifecycle, template selection and QR history

use super::qr::TemplateItem;
use crate::download::{attachment, PNG};
use crate::error::ServerError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use qr_core::{template, QrHistoryItem};
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

fn not_found(id: Uuid) -> ServerError {
    ServerError::NotFound(format!("Session {} not found", id))
}

/// POST /api/sessions
pub async fn handle_create(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { id }))
}

/// DELETE /api/sessions/:id
///
/// Ends the session and clears its history.
pub async fn handle_end(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    if state.sessions.end(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/sessions/:id/template/:index
///
/// Stores the template payload; a later QR request without `type` uses it.
pub async fn handle_select_template(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<TemplateItem>, ServerError> {
    let chosen = template(index)
        .ok_or_else(|| ServerError::NotFound(format!("No template at index {}", index)))?;

    state
        .sessions
        .with_session(id, |s| s.template_data = Some(chosen.payload.to_string()))
        .await
        .ok_or_else(|| not_found(id))?;

    Ok(Json(TemplateItem {
        index,
        name: chosen.name,
        payload: chosen.payload,
    }))
}

/// GET /api/sessions/:id/qr-history
///
/// Newest first.
pub async fn handle_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<QrHistoryItem>>, ServerError> {
    state
        .sessions
        .with_session(id, |s| s.qr_history.list())
        .await
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// GET /api/sessions/:id/qr-history/:index
pub async fn handle_history_image(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Response, ServerError> {
    let png = state
        .sessions
        .with_session(id, |s| s.qr_history.get(index).map(|e| e.image_png.clone()))
        .await
        .ok_or_else(|| not_found(id))?
        .ok_or_else(|| ServerError::NotFound(format!("No history entry at index {}", index)))?;

    Ok(attachment(&format!("qr_history_{}.png", index), PNG, png))
}
