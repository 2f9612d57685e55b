//! Route definitions for the message log view.
//!
//! ```text
//! GET    /                                  list_log (?page, search, direction)
//! POST   /                                  submit_replies (form, respond_<id> fields)
//! POST   /reply                             post_reply ({id, text})
//! GET    /latest                            latest_messages (?after_id)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::log;
use crate::state::AppState;

/// Log view routes -- mounted at `/log`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(log::list_log).post(log::submit_replies))
        .route("/reply", post(log::post_reply))
        .route("/latest", get(log::latest_messages))
}
