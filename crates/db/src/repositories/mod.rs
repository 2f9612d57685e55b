//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod contact_repo;
pub mod legacy_repo;
pub mod message_repo;

pub use contact_repo::ContactRepo;
pub use legacy_repo::LegacyRepo;
pub use message_repo::MessageRepo;
