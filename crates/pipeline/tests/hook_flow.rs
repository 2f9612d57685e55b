//! Integration tests for the router hooks and the reply service.
//!
//! Exercises the full watermark lifecycle against a real database:
//! incoming logging, reply threading, tagging, and outbound delivery
//! through a recording stand-in for the gateway.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use smslog_core::message::{MessageEnvelope, MessageStatus};
use smslog_db::repositories::MessageRepo;
use smslog_pipeline::hooks::{tag_message, MessageLogger};
use smslog_pipeline::reply::{ReplyError, ReplyService};
use smslog_pipeline::send::{OutboundSender, SendError};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Captures outgoing envelopes instead of delivering them.
#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<MessageEnvelope>>,
}

#[async_trait]
impl OutboundSender for RecordingSender {
    async fn send(&self, envelope: &MessageEnvelope) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}

fn inbound(text: &str) -> MessageEnvelope {
    MessageEnvelope::new("dataentry", "5551234", text)
}

async fn seed_contact(pool: &PgPool, first: &str, last: &str) -> i64 {
    let contact_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO contacts (first_name, last_name) VALUES ($1, $2) RETURNING id",
    )
    .bind(first)
    .bind(last)
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO contact_connections (backend, identity, contact_id) VALUES ($1, $2, $3)")
        .bind("dataentry")
        .bind("5551234")
        .bind(contact_id)
        .execute(pool)
        .await
        .unwrap();
    contact_id
}

// ---------------------------------------------------------------------------
// Incoming hook
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn incoming_hook_logs_and_watermarks(pool: PgPool) {
    let logger = MessageLogger::new(pool.clone());
    let mut envelope = inbound("hello");
    envelope.status = Some(MessageStatus::Success);

    let entry = logger.on_incoming(&mut envelope).await.unwrap();

    assert_eq!(envelope.logger_id, Some(entry.id));
    assert_eq!(entry.direction, "incoming");
    assert_eq!(entry.text, "hello");
    assert_eq!(entry.status.as_deref(), Some("success"));
    assert_eq!(entry.contact_id, None);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn incoming_hook_attributes_known_contacts(pool: PgPool) {
    let contact_id = seed_contact(&pool, "Jane", "Roe").await;
    let logger = MessageLogger::new(pool.clone());

    let mut envelope = inbound("hello");
    let entry = logger.on_incoming(&mut envelope).await.unwrap();
    assert_eq!(entry.contact_id, Some(contact_id));
}

// ---------------------------------------------------------------------------
// Outgoing hook and threading
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn outgoing_hook_without_watermark_is_unthreaded(pool: PgPool) {
    let logger = MessageLogger::new(pool.clone());

    let mut envelope = inbound("broadcast");
    let entry = logger.on_outgoing(&mut envelope).await.unwrap();

    assert_eq!(entry.direction, "outgoing");
    assert_eq!(entry.response_to, None);
    assert_eq!(envelope.logger_id, Some(entry.id));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn replies_thread_under_the_inbound_entry(pool: PgPool) {
    let logger = MessageLogger::new(pool.clone());

    let mut question = inbound("what is the water level?");
    let inbound_entry = logger.on_incoming(&mut question).await.unwrap();

    let mut first = question.reply("two meters");
    let first_entry = logger.on_outgoing(&mut first).await.unwrap();
    assert_eq!(first_entry.response_to, Some(inbound_entry.id));

    // The inbound envelope still carries the original watermark, so a
    // second reply threads under the same entry.
    let mut second = question.reply("and rising");
    let second_entry = logger.on_outgoing(&mut second).await.unwrap();
    assert_eq!(second_entry.response_to, Some(inbound_entry.id));

    // Each reply's own watermark moved on to its own entry.
    assert_eq!(first.logger_id, Some(first_entry.id));
    assert_eq!(second.logger_id, Some(second_entry.id));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn watermark_naming_an_outgoing_entry_does_not_thread(pool: PgPool) {
    let logger = MessageLogger::new(pool.clone());

    let mut outbound = inbound("announcement");
    let outbound_entry = logger.on_outgoing(&mut outbound).await.unwrap();

    // Watermark points at an outgoing entry; threading only targets
    // incoming entries, so the lookup misses and the message still logs.
    let mut followup = outbound.reply("correction");
    let followup_entry = logger.on_outgoing(&mut followup).await.unwrap();
    assert_eq!(followup.logger_id, Some(followup_entry.id));
    assert_eq!(followup_entry.response_to, None);
    assert_ne!(followup_entry.id, outbound_entry.id);
}

// ---------------------------------------------------------------------------
// Tagging
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn tagging_updates_the_watermarked_entry(pool: PgPool) {
    let logger = MessageLogger::new(pool.clone());
    let mut envelope = inbound("report 42");
    let entry = logger.on_incoming(&mut envelope).await.unwrap();

    let tagged = tag_message(&pool, envelope.logger_id, MessageStatus::Success)
        .await
        .unwrap();
    assert!(tagged);

    let reread = MessageRepo::find_by_id(&pool, entry.id).await.unwrap().unwrap();
    assert_eq!(reread.status.as_deref(), Some("success"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tagging_without_a_watermark_is_silent(pool: PgPool) {
    let tagged = tag_message(&pool, None, MessageStatus::Error).await.unwrap();
    assert!(!tagged);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tagging_a_vanished_entry_is_silent(pool: PgPool) {
    let tagged = tag_message(&pool, Some(99_999), MessageStatus::Error)
        .await
        .unwrap();
    assert!(!tagged);
}

// ---------------------------------------------------------------------------
// Reply service
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn respond_to_entry_logs_threads_and_sends(pool: PgPool) {
    let sender = Arc::new(RecordingSender::default());
    let replies = ReplyService::new(pool.clone(), sender.clone());
    let logger = MessageLogger::new(pool.clone());

    let mut question = inbound("help");
    let inbound_entry = logger.on_incoming(&mut question).await.unwrap();

    let reply_entry = replies
        .respond_to_entry(inbound_entry.id, "on our way")
        .await
        .unwrap();

    assert_eq!(reply_entry.direction, "outgoing");
    assert_eq!(reply_entry.response_to, Some(inbound_entry.id));
    assert_eq!(reply_entry.status.as_deref(), Some("from_logger"));

    let sent = sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].backend, "dataentry");
    assert_eq!(sent[0].identity, "5551234");
    assert_eq!(sent[0].text, "on our way");
    assert_eq!(sent[0].logger_id, Some(reply_entry.id));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn respond_to_unknown_entry_fails(pool: PgPool) {
    let replies = ReplyService::new(pool.clone(), Arc::new(RecordingSender::default()));

    let err = replies.respond_to_entry(99_999, "hello?").await.unwrap_err();
    assert!(matches!(err, ReplyError::UnknownEntry(99_999)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn responding_to_an_outgoing_entry_sends_unthreaded(pool: PgPool) {
    let sender = Arc::new(RecordingSender::default());
    let replies = ReplyService::new(pool.clone(), sender.clone());
    let logger = MessageLogger::new(pool.clone());

    let mut outbound = inbound("announcement");
    let outbound_entry = logger.on_outgoing(&mut outbound).await.unwrap();

    let reply_entry = replies
        .respond_to_entry(outbound_entry.id, "follow-up")
        .await
        .unwrap();
    assert_eq!(reply_entry.response_to, None);
    assert_eq!(sender.sent.lock().unwrap().len(), 1);
}
