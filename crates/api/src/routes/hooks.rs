//! Route definitions for the message pipeline hooks.
//!
//! ```text
//! POST   /incoming                          incoming (log received message)
//! POST   /outgoing                          outgoing (log sent message)
//! POST   /tag                               tag (update status of logged message)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::hooks;
use crate::state::AppState;

/// Pipeline hook routes -- mounted at `/hooks`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/incoming", post(hooks::incoming))
        .route("/outgoing", post(hooks::outgoing))
        .route("/tag", post(hooks::tag))
}
