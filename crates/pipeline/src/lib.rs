//! Message-processing hooks that persist SMS traffic to the log.
//!
//! The pipeline crate sits between the transport layer and the database:
//! [`hooks::MessageLogger`] records every message that passes through the
//! router, [`reply::ReplyService`] sends operator responses back out through
//! an [`send::OutboundSender`], and the watermark carried on
//! [`smslog_core::message::MessageEnvelope`] ties outgoing messages back to
//! the incoming messages that triggered them.

pub mod hooks;
pub mod reply;
pub mod send;

pub use hooks::{tag_message, MessageLogger};
pub use reply::{ReplyError, ReplyService};
pub use send::{HttpOutboundSender, OutboundSender, SendError};
