//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Accounts live in the host platform; this service only validates the
//! tokens it issues and never stores credentials.

pub mod jwt;
