//! Operator replies to logged messages.
//!
//! A reply is an ordinary outgoing message aimed back at the channel a
//! logged entry arrived on. [`ReplyService`] builds the envelope, runs it
//! through the outgoing hook so it lands in the log threaded under the
//! entry it answers, and hands it to the [`OutboundSender`].

use std::sync::Arc;

use smslog_core::message::{MessageEnvelope, MessageStatus};
use smslog_core::types::DbId;
use smslog_db::models::message::LoggedMessage;
use smslog_db::repositories::MessageRepo;
use smslog_db::DbPool;

use crate::hooks::MessageLogger;
use crate::send::{OutboundSender, SendError};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for reply submission failures.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    /// The entry being replied to does not exist.
    #[error("No logged message with id {0}")]
    UnknownEntry(DbId),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Send(#[from] SendError),
}

// ---------------------------------------------------------------------------
// ReplyService
// ---------------------------------------------------------------------------

/// Sends operator replies out through the gateway, logging them first.
#[derive(Clone)]
pub struct ReplyService {
    pool: DbPool,
    logger: MessageLogger,
    sender: Arc<dyn OutboundSender>,
}

impl ReplyService {
    pub fn new(pool: DbPool, sender: Arc<dyn OutboundSender>) -> Self {
        let logger = MessageLogger::new(pool.clone());
        Self {
            pool,
            logger,
            sender,
        }
    }

    /// Reply to the logged entry with the given id.
    ///
    /// The outgoing message is logged before it is handed to the gateway,
    /// mirroring a router that records at dispatch time. Replying to an
    /// outgoing entry is allowed; the result simply is not threaded, since
    /// threading only ever targets incoming entries.
    pub async fn respond_to_entry(
        &self,
        id: DbId,
        text: impl Into<String>,
    ) -> Result<LoggedMessage, ReplyError> {
        let target = MessageRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(ReplyError::UnknownEntry(id))?;

        let mut envelope = MessageEnvelope {
            backend: target.backend.clone(),
            identity: target.identity.clone(),
            text: text.into(),
            status: Some(MessageStatus::FromLogger),
            logger_id: Some(target.id),
        };

        let entry = self.logger.on_outgoing(&mut envelope).await?;
        self.sender.send(&envelope).await?;

        tracing::info!(
            entry_id = entry.id,
            replying_to = id,
            backend = %envelope.backend,
            identity = %envelope.identity,
            "Sent reply"
        );
        Ok(entry)
    }
}
