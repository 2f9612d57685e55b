//! Message vocabulary shared by the ingestion hooks, the persistence layer,
//! and the web log (LOG-3).
//!
//! The host SMS pipeline hands us a [`MessageEnvelope`] for every message it
//! routes. The envelope carries an explicit `logger_id` watermark: the hooks
//! write the id of the stored log entry into it, and replies built with
//! [`MessageEnvelope::reply`] inherit it so an outgoing message can be linked
//! back to the inbound message that solicited it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a backend (transport channel) slug.
pub const MAX_BACKEND_LENGTH: usize = 75;

/// Maximum length of a message identity (phone number).
pub const MAX_IDENTITY_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Whether a message was received by the system or sent by it.
///
/// Fixed at creation time; nothing ever flips the direction of a stored
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }

    /// Parse from a wire-format string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "incoming" => Ok(Self::Incoming),
            "outgoing" => Ok(Self::Outgoing),
            _ => Err(CoreError::Validation(format!(
                "Invalid direction: '{s}'. Must be one of: incoming, outgoing"
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MessageStatus
// ---------------------------------------------------------------------------

/// Processing status attached to a logged message.
///
/// The vocabulary is shared by both directions: apps tag inbound messages
/// with the outcome of handling them (`success`, `parse_error`, ...) and
/// outbound messages describe why they were sent (`alert`, `reminder`, ...).
/// `from_logger` marks an operator reply issued from the web log view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Success,
    Warning,
    Error,
    Info,
    Alert,
    Reminder,
    FromLogger,
    SystemError,
    Mixed,
    ParseError,
    BadValue,
    Inapplicable,
    NotAllowed,
}

impl MessageStatus {
    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
            Self::Alert => "alert",
            Self::Reminder => "reminder",
            Self::FromLogger => "from_logger",
            Self::SystemError => "system_error",
            Self::Mixed => "mixed",
            Self::ParseError => "parse_error",
            Self::BadValue => "bad_value",
            Self::Inapplicable => "inapplicable",
            Self::NotAllowed => "not_allowed",
        }
    }

    /// Parse from a wire-format string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "info" => Ok(Self::Info),
            "alert" => Ok(Self::Alert),
            "reminder" => Ok(Self::Reminder),
            "from_logger" => Ok(Self::FromLogger),
            "system_error" => Ok(Self::SystemError),
            "mixed" => Ok(Self::Mixed),
            "parse_error" => Ok(Self::ParseError),
            "bad_value" => Ok(Self::BadValue),
            "inapplicable" => Ok(Self::Inapplicable),
            "not_allowed" => Ok(Self::NotAllowed),
            _ => Err(CoreError::Validation(format!(
                "Invalid status: '{s}'. Must be one of: success, warning, error, \
                 info, alert, reminder, from_logger, system_error, mixed, \
                 parse_error, bad_value, inapplicable, not_allowed"
            ))),
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MessageEnvelope
// ---------------------------------------------------------------------------

/// A message as it travels through the host pipeline.
///
/// `logger_id` is the log watermark. After the incoming hook runs it holds
/// the id of the stored inbound entry; a reply built from the envelope
/// inherits it, which is how the outgoing hook knows which inbound entry
/// the reply answers. After the outgoing hook runs it is overwritten with
/// the id of the stored outbound entry, so later tagging targets the right
/// row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Transport channel slug (e.g. `"dataentry"`).
    pub backend: String,
    /// Remote endpoint, usually a phone number.
    pub identity: String,
    /// Message body.
    pub text: String,
    /// Processing status, if the host pipeline has assigned one.
    #[serde(default)]
    pub status: Option<MessageStatus>,
    /// Log watermark: the id of the stored entry for this message.
    #[serde(default)]
    pub logger_id: Option<DbId>,
}

impl MessageEnvelope {
    pub fn new(
        backend: impl Into<String>,
        identity: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            identity: identity.into(),
            text: text.into(),
            status: None,
            logger_id: None,
        }
    }

    /// Build an outgoing reply to this message.
    ///
    /// The reply shares the sender's channel and inherits this envelope's
    /// watermark unchanged, so the outgoing hook can link it back to the
    /// entry that solicited it. Replying several times produces several
    /// outbound entries that all answer the same inbound entry.
    pub fn reply(&self, text: impl Into<String>) -> MessageEnvelope {
        MessageEnvelope {
            backend: self.backend.clone(),
            identity: self.identity.clone(),
            text: text.into(),
            status: None,
            logger_id: self.logger_id,
        }
    }
}

/// Validate an envelope before it is logged.
///
/// The channel fields must be present and fit the storage columns; the text
/// may be anything the transport delivered, including empty.
pub fn validate_envelope(envelope: &MessageEnvelope) -> Result<(), CoreError> {
    if envelope.backend.trim().is_empty() {
        return Err(CoreError::Validation(
            "Message backend must not be empty".to_string(),
        ));
    }
    if envelope.backend.len() > MAX_BACKEND_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message backend exceeds maximum length of {MAX_BACKEND_LENGTH} characters"
        )));
    }
    if envelope.identity.trim().is_empty() {
        return Err(CoreError::Validation(
            "Message identity must not be empty".to_string(),
        ));
    }
    if envelope.identity.len() > MAX_IDENTITY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message identity exceeds maximum length of {MAX_IDENTITY_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Direction parsing ---------------------------------------------------

    #[test]
    fn direction_roundtrip() {
        let pairs = [
            ("incoming", Direction::Incoming),
            ("outgoing", Direction::Outgoing),
        ];
        for (s, variant) in &pairs {
            assert_eq!(&Direction::from_str(s).unwrap(), variant);
            assert_eq!(variant.as_str(), *s);
        }
    }

    #[test]
    fn direction_invalid_rejects() {
        assert!(Direction::from_str("sideways").is_err());
        assert!(Direction::from_str("I").is_err());
    }

    // -- MessageStatus parsing -----------------------------------------------

    #[test]
    fn status_all_variants_roundtrip() {
        let pairs = [
            ("success", MessageStatus::Success),
            ("warning", MessageStatus::Warning),
            ("error", MessageStatus::Error),
            ("info", MessageStatus::Info),
            ("alert", MessageStatus::Alert),
            ("reminder", MessageStatus::Reminder),
            ("from_logger", MessageStatus::FromLogger),
            ("system_error", MessageStatus::SystemError),
            ("mixed", MessageStatus::Mixed),
            ("parse_error", MessageStatus::ParseError),
            ("bad_value", MessageStatus::BadValue),
            ("inapplicable", MessageStatus::Inapplicable),
            ("not_allowed", MessageStatus::NotAllowed),
        ];
        for (s, variant) in &pairs {
            assert_eq!(&MessageStatus::from_str(s).unwrap(), variant);
            assert_eq!(variant.as_str(), *s);
        }
    }

    #[test]
    fn status_invalid_rejects() {
        assert!(MessageStatus::from_str("good").is_err());
        assert!(MessageStatus::from_str("").is_err());
    }

    // -- Envelope serialization ----------------------------------------------

    #[test]
    fn envelope_serializes_snake_case_status() {
        let mut envelope = MessageEnvelope::new("dataentry", "5551234", "hi");
        envelope.status = Some(MessageStatus::ParseError);

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "parse_error");
        assert_eq!(json["logger_id"], serde_json::Value::Null);
    }

    #[test]
    fn envelope_deserializes_with_missing_optionals() {
        let envelope: MessageEnvelope = serde_json::from_str(
            r#"{"backend": "dataentry", "identity": "5551234", "text": "hi"}"#,
        )
        .unwrap();
        assert_eq!(envelope.status, None);
        assert_eq!(envelope.logger_id, None);
    }

    // -- reply ---------------------------------------------------------------

    #[test]
    fn reply_copies_channel_and_watermark() {
        let mut inbound = MessageEnvelope::new("dataentry", "5551234", "help");
        inbound.logger_id = Some(42);

        let reply = inbound.reply("on our way");
        assert_eq!(reply.backend, "dataentry");
        assert_eq!(reply.identity, "5551234");
        assert_eq!(reply.text, "on our way");
        assert_eq!(reply.logger_id, Some(42));
        assert_eq!(reply.status, None);
    }

    #[test]
    fn reply_without_watermark_carries_none() {
        let inbound = MessageEnvelope::new("dataentry", "5551234", "help");
        let reply = inbound.reply("ok");
        assert_eq!(reply.logger_id, None);
    }

    #[test]
    fn repeated_replies_share_the_watermark() {
        let mut inbound = MessageEnvelope::new("dataentry", "5551234", "help");
        inbound.logger_id = Some(7);

        let first = inbound.reply("first");
        let second = inbound.reply("second");
        assert_eq!(first.logger_id, Some(7));
        assert_eq!(second.logger_id, Some(7));
    }

    // -- validate_envelope ---------------------------------------------------

    #[test]
    fn valid_envelope() {
        let envelope = MessageEnvelope::new("dataentry", "5551234", "hi");
        assert!(validate_envelope(&envelope).is_ok());
    }

    #[test]
    fn empty_backend_rejects() {
        let envelope = MessageEnvelope::new("", "5551234", "hi");
        assert!(validate_envelope(&envelope).is_err());
        let envelope = MessageEnvelope::new("   ", "5551234", "hi");
        assert!(validate_envelope(&envelope).is_err());
    }

    #[test]
    fn empty_identity_rejects() {
        let envelope = MessageEnvelope::new("dataentry", "", "hi");
        assert!(validate_envelope(&envelope).is_err());
    }

    #[test]
    fn oversize_channel_fields_reject() {
        let envelope = MessageEnvelope::new("b".repeat(MAX_BACKEND_LENGTH + 1), "5551234", "hi");
        assert!(validate_envelope(&envelope).is_err());

        let envelope = MessageEnvelope::new("dataentry", "5".repeat(MAX_IDENTITY_LENGTH + 1), "hi");
        assert!(validate_envelope(&envelope).is_err());
    }

    #[test]
    fn empty_text_is_allowed() {
        let envelope = MessageEnvelope::new("dataentry", "5551234", "");
        assert!(validate_envelope(&envelope).is_ok());
    }
}
