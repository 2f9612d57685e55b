//! Row model for the predecessor logging app's messages.

use serde::Serialize;
use smslog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A message from the predecessor log, as staged for import.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LegacyMessage {
    pub id: DbId,
    pub date: Timestamp,
    pub direction: String,
    pub text: String,
    pub backend: Option<String>,
    pub identity: Option<String>,
    pub contact_id: Option<DbId>,
}

impl LegacyMessage {
    /// The message's channel, when the predecessor row still has one.
    /// Rows that lost their connection record return `None` and are
    /// skipped by the import.
    pub fn channel(&self) -> Option<(&str, &str)> {
        match (self.backend.as_deref(), self.identity.as_deref()) {
            (Some(backend), Some(identity)) => Some((backend, identity)),
            _ => None,
        }
    }
}
