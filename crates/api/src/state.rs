use std::sync::Arc;

use smslog_pipeline::{MessageLogger, ReplyService};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: smslog_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Router hooks used by the ingestion endpoints.
    pub logger: MessageLogger,
    /// Reply submission service (logs, threads, and dispatches replies).
    pub replies: ReplyService,
}
