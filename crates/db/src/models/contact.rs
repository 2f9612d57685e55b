//! Contact read model.
//!
//! Contacts and their channel connections are owned by the host platform;
//! this service only resolves and displays them.

use serde::Serialize;
use smslog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A contact as resolved through a channel connection.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub location: Option<String>,
    pub created_at: Timestamp,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
