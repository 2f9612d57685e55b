//! Router hooks that write message traffic to the log (LOG-3).
//!
//! [`MessageLogger`] is registered on both sides of the message router.
//! Incoming messages are recorded before the handler apps see them, so the
//! log holds every message even when no app claims it. Outgoing messages
//! are recorded on their way to the transport and, when the envelope still
//! carries the watermark of the inbound message that triggered them, linked
//! to it via `response_to`.

use smslog_core::message::{Direction, MessageEnvelope, MessageStatus};
use smslog_core::types::DbId;
use smslog_db::models::message::{CreateLoggedMessage, LoggedMessage};
use smslog_db::repositories::{ContactRepo, MessageRepo};
use smslog_db::DbPool;

// ---------------------------------------------------------------------------
// MessageLogger
// ---------------------------------------------------------------------------

/// Records router traffic. Cheap to clone; holds only the pool handle.
#[derive(Clone)]
pub struct MessageLogger {
    pool: DbPool,
}

impl MessageLogger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record an incoming message and watermark the envelope with the new
    /// entry's id, so any response produced downstream can be traced back
    /// to it.
    ///
    /// Never blocks the message: handler apps run regardless of what the
    /// log says.
    pub async fn on_incoming(
        &self,
        envelope: &mut MessageEnvelope,
    ) -> Result<LoggedMessage, sqlx::Error> {
        let contact_id = self.resolve_contact(envelope).await;
        let entry = MessageRepo::create(
            &self.pool,
            &CreateLoggedMessage {
                direction: Direction::Incoming,
                text: envelope.text.clone(),
                backend: envelope.backend.clone(),
                identity: envelope.identity.clone(),
                contact_id,
                status: envelope.status,
                response_to: None,
            },
        )
        .await?;

        envelope.logger_id = Some(entry.id);
        tracing::debug!(
            entry_id = entry.id,
            backend = %envelope.backend,
            identity = %envelope.identity,
            "Logged incoming message"
        );
        Ok(entry)
    }

    /// Record an outgoing message, thread it under the incoming entry its
    /// watermark names, and move the watermark onto the new entry.
    ///
    /// A watermark that does not resolve to an incoming entry leaves the
    /// message unthreaded; the message is still logged and sent.
    pub async fn on_outgoing(
        &self,
        envelope: &mut MessageEnvelope,
    ) -> Result<LoggedMessage, sqlx::Error> {
        let contact_id = self.resolve_contact(envelope).await;

        let mut response_to = None;
        if let Some(watermark) = envelope.logger_id {
            response_to = MessageRepo::find_incoming_by_id(&self.pool, watermark)
                .await?
                .map(|original| original.id);
            if response_to.is_none() {
                tracing::debug!(watermark, "Watermark matches no incoming entry, not threading");
            }
        }

        let entry = MessageRepo::create(
            &self.pool,
            &CreateLoggedMessage {
                direction: Direction::Outgoing,
                text: envelope.text.clone(),
                backend: envelope.backend.clone(),
                identity: envelope.identity.clone(),
                contact_id,
                status: envelope.status,
                response_to,
            },
        )
        .await?;

        envelope.logger_id = Some(entry.id);
        tracing::debug!(
            entry_id = entry.id,
            response_to = ?entry.response_to,
            backend = %envelope.backend,
            identity = %envelope.identity,
            "Logged outgoing message"
        );
        Ok(entry)
    }

    /// Resolve the envelope's channel to a known contact. Lookup failures
    /// degrade to an unattributed entry rather than losing the message.
    async fn resolve_contact(&self, envelope: &MessageEnvelope) -> Option<DbId> {
        match ContactRepo::resolve(&self.pool, &envelope.backend, &envelope.identity).await {
            Ok(contact) => contact.map(|c| c.id),
            Err(e) => {
                tracing::warn!(
                    backend = %envelope.backend,
                    identity = %envelope.identity,
                    error = %e,
                    "Contact lookup failed, logging message without attribution"
                );
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tagging
// ---------------------------------------------------------------------------

/// Update the status of the entry a watermark points at.
///
/// Handler apps call this with `envelope.logger_id` after deciding what an
/// incoming message meant. A missing watermark, or one naming a deleted
/// entry, is silently ignored so tagging can never break message handling.
pub async fn tag_message(
    pool: &DbPool,
    watermark: Option<DbId>,
    status: MessageStatus,
) -> Result<bool, sqlx::Error> {
    let Some(id) = watermark else {
        tracing::debug!(status = %status, "No watermark, nothing to tag");
        return Ok(false);
    };

    let tagged = MessageRepo::set_status(pool, id, status).await?;
    if !tagged {
        tracing::debug!(entry_id = id, "Tag target no longer exists, ignoring");
    }
    Ok(tagged)
}
