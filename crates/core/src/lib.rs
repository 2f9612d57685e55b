//! Domain types and pure logic for the message log.
//!
//! This crate has no internal dependencies so the persistence layer, the
//! ingestion hooks, the import command, and the API server can all share
//! the same vocabulary.

pub mod error;
pub mod ident;
pub mod message;
pub mod paging;
pub mod pairing;
pub mod roles;
pub mod types;
