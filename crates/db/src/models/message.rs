//! Logged message entity and DTOs.

use serde::Serialize;
use smslog_core::message::{Direction, MessageStatus};
use smslog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A single logged message. The row is written once by the hooks or the
/// import; afterwards only `status` (tagging) ever changes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LoggedMessage {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub direction: String,
    pub text: String,
    pub backend: String,
    pub identity: String,
    pub contact_id: Option<DbId>,
    pub status: Option<String>,
    /// For an outgoing message: the incoming message it answers.
    pub response_to: Option<DbId>,
}

impl LoggedMessage {
    pub fn is_incoming(&self) -> bool {
        self.direction == Direction::Incoming.as_str()
    }
}

// ---------------------------------------------------------------------------
// Create DTOs
// ---------------------------------------------------------------------------

/// DTO for logging a live message. The timestamp is assigned by the
/// database; the outgoing hook resolves its watermark into `response_to`
/// before the insert so each row is written exactly once.
#[derive(Debug, Clone)]
pub struct CreateLoggedMessage {
    pub direction: Direction,
    pub text: String,
    pub backend: String,
    pub identity: String,
    pub contact_id: Option<DbId>,
    pub status: Option<MessageStatus>,
    pub response_to: Option<DbId>,
}

/// DTO for the legacy import, which must preserve historical timestamps
/// and may pair an outgoing row with its inbound counterpart at insert
/// time. Imported rows never carry a status; the predecessor log had none.
#[derive(Debug, Clone)]
pub struct ImportedMessage {
    pub timestamp: Timestamp,
    pub direction: Direction,
    pub text: String,
    pub backend: String,
    pub identity: String,
    pub contact_id: Option<DbId>,
    pub response_to: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Filter parameters for the log view listing.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Case-insensitive substring match across identity, text, and the
    /// contact's first and last name.
    pub search: Option<String>,
    /// Restrict to a single direction.
    pub direction: Option<Direction>,
}

/// A log row joined with its contact's display fields, as returned by the
/// listing queries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListedMessage {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub direction: String,
    pub text: String,
    pub backend: String,
    pub identity: String,
    pub contact_id: Option<DbId>,
    pub status: Option<String>,
    pub response_to: Option<DbId>,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_location: Option<String>,
}

impl ListedMessage {
    /// The contact's full name, when the message resolved to a contact.
    pub fn contact_name(&self) -> Option<String> {
        match (&self.contact_first_name, &self.contact_last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            _ => None,
        }
    }
}
