//! Well-known role names and the log permissions they grant.
//!
//! Accounts are managed by the host platform; tokens arrive with one of
//! these role names in their claims. Viewing the log and responding to
//! messages from it are separate capabilities, so a read-only role can be
//! handed out for monitoring.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OPERATOR: &str = "operator";
pub const ROLE_VIEWER: &str = "viewer";

/// Whether a role may browse and search the message log.
pub fn can_view(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_OPERATOR || role == ROLE_VIEWER
}

/// Whether a role may send replies from the log view.
pub fn can_respond(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_OPERATOR
}
