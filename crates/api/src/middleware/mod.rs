//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireViewer`] -- Requires any role that may browse the log.
//! - [`rbac::RequireResponder`] -- Requires a role that may send replies.

pub mod auth;
pub mod rbac;
