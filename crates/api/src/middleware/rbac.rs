//! Capability-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not grant the capability. Viewing the log and responding from it are
//! separate capabilities (see [`smslog_core::roles`]), so a read-only role
//! can browse without being able to send.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use smslog_core::error::CoreError;
use smslog_core::roles::{can_respond, can_view};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a role that may browse and search the log. Rejects with 403
/// Forbidden otherwise.
///
/// ```ignore
/// async fn view_log(RequireViewer(user): RequireViewer) -> AppResult<Json<()>> {
///     // user may read the log here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireViewer(pub AuthUser);

impl FromRequestParts<AppState> for RequireViewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_view(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Log view permission required".into(),
            )));
        }
        Ok(RequireViewer(user))
    }
}

/// Requires a role that may send replies from the log view. Rejects with
/// 403 Forbidden otherwise.
///
/// ```ignore
/// async fn send_reply(RequireResponder(user): RequireResponder) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireResponder(pub AuthUser);

impl FromRequestParts<AppState> for RequireResponder {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_respond(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Respond permission required".into(),
            )));
        }
        Ok(RequireResponder(user))
    }
}
