//! Handlers for the message log view.
//!
//! The log view is a threaded listing: incoming messages and unanswered
//! outgoing messages at the top level, with replies nested beneath the
//! entries they answer. Operators with the respond capability can send
//! replies straight from the listing.

use std::collections::HashMap;
use std::sync::OnceLock;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum::{Form, Json};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use smslog_core::ident::{humanize_age, ident_string};
use smslog_core::message::Direction;
use smslog_core::paging::{clamp_page, page_count, page_offset, parse_page, MESSAGES_PER_PAGE};
use smslog_core::types::{DbId, Timestamp};
use smslog_db::models::message::{ListedMessage, LogFilter};
use smslog_db::repositories::MessageRepo;
use smslog_db::DbPool;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireResponder, RequireViewer};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for the log listing.
///
/// `page` is deliberately a string: any non-numeric value falls back to
/// page 1 and out-of-range values clamp to the last page, so a stale or
/// hand-edited URL never errors.
#[derive(Debug, Deserialize)]
pub struct LogQueryParams {
    pub page: Option<String>,
    pub search: Option<String>,
    pub direction: Option<String>,
}

/// Request body for a single JSON reply.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub id: DbId,
    pub text: String,
}

/// Query parameters for the live polling endpoint.
#[derive(Debug, Deserialize)]
pub struct LatestQueryParams {
    pub after_id: Option<DbId>,
}

/// One rendered log entry, with its replies nested beneath it.
#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub id: DbId,
    pub direction: String,
    pub text: String,
    pub status: Option<String>,
    /// Sender identification line, e.g. `"dataentry 5551234 (Jane Roe)"`.
    pub ident: String,
    pub timestamp: Timestamp,
    /// Fuzzy age, e.g. `"5 minutes ago"` or `"yesterday"`.
    pub age: String,
    pub responses: Vec<LogEntry>,
}

/// One page of the log listing.
#[derive(Debug, Serialize)]
pub struct LogPage {
    pub items: Vec<LogEntry>,
    pub page: i64,
    pub page_count: i64,
    pub total: i64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn log_entry(row: &ListedMessage, now: Timestamp) -> LogEntry {
    LogEntry {
        id: row.id,
        direction: row.direction.clone(),
        text: row.text.clone(),
        status: row.status.clone(),
        ident: ident_string(
            &row.backend,
            &row.identity,
            row.contact_name().as_deref(),
            row.contact_location.as_deref(),
        ),
        timestamp: row.timestamp,
        age: humanize_age(row.timestamp, now),
        responses: Vec::new(),
    }
}

/// Render top-level rows with their replies nested beneath them. All ages
/// are computed against a single `now` so one page never mixes clocks.
async fn thread_responses(
    pool: &DbPool,
    rows: Vec<ListedMessage>,
) -> Result<Vec<LogEntry>, sqlx::Error> {
    let now = Utc::now();
    let ids: Vec<DbId> = rows.iter().map(|m| m.id).collect();

    let mut children: HashMap<DbId, Vec<LogEntry>> = HashMap::new();
    for response in MessageRepo::list_responses(pool, &ids).await? {
        if let Some(parent) = response.response_to {
            children.entry(parent).or_default().push(log_entry(&response, now));
        }
    }

    Ok(rows
        .iter()
        .map(|row| {
            let mut entry = log_entry(row, now);
            entry.responses = children.remove(&row.id).unwrap_or_default();
            entry
        })
        .collect())
}

/// Extract the entry id from an inline-reply form field name
/// (`respond_<id>`). Other fields return `None`.
fn respond_field_id(name: &str) -> Option<DbId> {
    static RESPOND_FIELD: OnceLock<Regex> = OnceLock::new();
    let re = RESPOND_FIELD
        .get_or_init(|| Regex::new(r"^respond_(\d+)$").expect("respond field regex is valid"));
    re.captures(name)?.get(1)?.as_str().parse().ok()
}

// ---------------------------------------------------------------------------
// GET /log
// ---------------------------------------------------------------------------

/// List one page of the log, threaded and filtered.
pub async fn list_log(
    State(state): State<AppState>,
    RequireViewer(_user): RequireViewer,
    Query(params): Query<LogQueryParams>,
) -> AppResult<impl IntoResponse> {
    let direction = match params.direction.as_deref() {
        Some(raw) => Some(Direction::from_str(raw)?),
        None => None,
    };
    let filter = LogFilter {
        search: params.search,
        direction,
    };

    let total = MessageRepo::count(&state.pool, &filter).await?;
    let pages = page_count(total);
    let page = clamp_page(parse_page(params.page.as_deref()), pages);

    let rows = MessageRepo::list_page(&state.pool, &filter, MESSAGES_PER_PAGE, page_offset(page))
        .await?;
    let items = thread_responses(&state.pool, rows).await?;

    Ok(Json(DataResponse {
        data: LogPage {
            items,
            page,
            page_count: pages,
            total,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /log
// ---------------------------------------------------------------------------

/// Send the inline replies submitted from the log view.
///
/// The form carries one `respond_<id>` field per visible entry; only
/// fields whose value is longer than one character are sent, so stray
/// single-key presses do not fire replies. Responds with a redirect back
/// to the listing.
pub async fn submit_replies(
    State(state): State<AppState>,
    RequireResponder(user): RequireResponder,
    Form(fields): Form<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let mut replies: Vec<(DbId, &String)> = fields
        .iter()
        .filter_map(|(name, value)| Some((respond_field_id(name)?, value)))
        .filter(|(_, value)| value.len() > 1)
        .collect();
    replies.sort_by_key(|(id, _)| *id);

    for (id, text) in replies {
        let entry = state.replies.respond_to_entry(id, text.clone()).await?;
        tracing::info!(
            user_id = user.user_id,
            entry_id = entry.id,
            replying_to = id,
            "Inline reply sent"
        );
    }

    Ok(Redirect::to("/api/v1/log"))
}

// ---------------------------------------------------------------------------
// POST /log/reply
// ---------------------------------------------------------------------------

/// Send a single reply to a logged entry.
pub async fn post_reply(
    State(state): State<AppState>,
    RequireResponder(user): RequireResponder,
    Json(body): Json<ReplyRequest>,
) -> AppResult<impl IntoResponse> {
    let entry = state.replies.respond_to_entry(body.id, body.text).await?;
    tracing::info!(
        user_id = user.user_id,
        entry_id = entry.id,
        replying_to = body.id,
        "Reply sent"
    );
    Ok(Json(json!({ "status": "ok" })))
}

// ---------------------------------------------------------------------------
// GET /log/latest
// ---------------------------------------------------------------------------

/// Top-level entries newer than a known id, for the polling live view.
pub async fn latest_messages(
    State(state): State<AppState>,
    RequireViewer(_user): RequireViewer,
    Query(params): Query<LatestQueryParams>,
) -> AppResult<impl IntoResponse> {
    let after_id = params.after_id.unwrap_or(0);
    let rows = MessageRepo::list_since(&state.pool, after_id, MESSAGES_PER_PAGE).await?;
    let items = thread_responses(&state.pool, rows).await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
