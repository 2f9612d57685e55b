//! Request handlers for the message log service.
//!
//! - [`log`] -- the paginated log view, reply submission, and live polling.
//! - [`hooks`] -- the endpoints the host pipeline calls to record traffic.
//!
//! Handlers delegate to `smslog_db` repositories and the `smslog_pipeline`
//! services, mapping errors via [`crate::error::AppError`].

pub mod hooks;
pub mod log;
