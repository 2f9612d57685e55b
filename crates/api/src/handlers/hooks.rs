//! Handlers for the message pipeline hooks.
//!
//! The host SMS router calls these endpoints for every message it moves:
//! `incoming` before apps handle a received message, `outgoing` before a
//! sent message leaves for its backend, and `tag` after the apps have
//! decided what a message meant. Each call hands over the full message
//! envelope; the incoming and outgoing hooks return it with the
//! `logger_id` watermark filled in so the router can carry it forward.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use smslog_core::message::{validate_envelope, MessageEnvelope, MessageStatus};
use smslog_core::types::DbId;
use smslog_db::models::message::LoggedMessage;
use smslog_pipeline::tag_message;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Result of logging a message: the (now watermarked) envelope plus the
/// stored entry it produced.
#[derive(Debug, Serialize)]
pub struct HookResponse {
    pub envelope: MessageEnvelope,
    pub entry: LoggedMessage,
}

/// Request body for the tag hook.
#[derive(Debug, Deserialize)]
pub struct TagRequest {
    /// Watermark carried on the envelope being tagged. Absent when the
    /// message was never logged; the tag is then dropped silently.
    pub logger_id: Option<DbId>,
    pub status: MessageStatus,
}

// ---------------------------------------------------------------------------
// POST /hooks/incoming
// ---------------------------------------------------------------------------

/// Log a received message and watermark its envelope.
pub async fn incoming(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(mut envelope): Json<MessageEnvelope>,
) -> AppResult<impl IntoResponse> {
    validate_envelope(&envelope)?;
    let entry = state.logger.on_incoming(&mut envelope).await?;
    Ok(Json(DataResponse {
        data: HookResponse { envelope, entry },
    }))
}

// ---------------------------------------------------------------------------
// POST /hooks/outgoing
// ---------------------------------------------------------------------------

/// Log a sent message, linking it to the incoming message it answers
/// when its envelope carries a watermark.
pub async fn outgoing(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(mut envelope): Json<MessageEnvelope>,
) -> AppResult<impl IntoResponse> {
    validate_envelope(&envelope)?;
    let entry = state.logger.on_outgoing(&mut envelope).await?;
    Ok(Json(DataResponse {
        data: HookResponse { envelope, entry },
    }))
}

// ---------------------------------------------------------------------------
// POST /hooks/tag
// ---------------------------------------------------------------------------

/// Update the status of an already-logged message.
pub async fn tag(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<TagRequest>,
) -> AppResult<impl IntoResponse> {
    let tagged = tag_message(&state.pool, body.logger_id, body.status).await?;
    Ok(Json(json!({ "tagged": tagged })))
}
