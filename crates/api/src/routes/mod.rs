pub mod health;
pub mod hooks;
pub mod log;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /log                                    list page (GET), inline replies (POST)
/// /log/reply                              single JSON reply (POST)
/// /log/latest                             entries newer than ?after_id (GET)
///
/// /hooks/incoming                         log a received message (POST)
/// /hooks/outgoing                         log a sent message (POST)
/// /hooks/tag                              tag a logged message (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // The threaded log view and its reply endpoints.
        .nest("/log", log::router())
        // Hooks called by the host SMS router for every message it moves.
        .nest("/hooks", hooks::router())
}
