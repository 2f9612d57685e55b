//! Row models and DTOs.
//!
//! Each submodule pairs a `FromRow` + `Serialize` entity struct matching
//! the database row with plain DTOs for inserts and filters. Enum-ish
//! columns (direction, status) are held as `String` on the entity and as
//! typed enums on the DTOs, which bind them via `as_str()`.

pub mod contact;
pub mod legacy;
pub mod message;
