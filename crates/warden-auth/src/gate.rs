//! Per-request authentication and authorization.

use std::sync::Arc;

use tracing::debug;

use warden_core::error::{AppError, ErrorKind};
use warden_core::types::UserIdentity;

use crate::rbac::PolicyEnforcer;
use crate::session::SessionManager;

/// Extracts the credential from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Result<&str, AppError> {
    let header =
        authorization.ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    match header.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() => Ok(token),
        _ => Err(AppError::unauthorized(
            "Invalid Authorization header format, expected 'Bearer <token>'",
        )),
    }
}

/// Admits a request only if it carries a valid access token and the token's
/// role is allowed to call the requested endpoint.
#[derive(Debug, Clone)]
pub struct RequestGate {
    sessions: Arc<SessionManager>,
    enforcer: Arc<PolicyEnforcer>,
}

impl RequestGate {
    pub fn new(sessions: Arc<SessionManager>, enforcer: Arc<PolicyEnforcer>) -> Self {
        Self { sessions, enforcer }
    }

    /// Authenticates the bearer token, then checks `(role, path, method)`.
    ///
    /// Any credential problem is `Unauthorized`; a policy denial is
    /// `Forbidden`; a failure while evaluating policy is `Internal`.
    pub async fn admit(
        &self,
        authorization: Option<&str>,
        path: &str,
        method: &str,
    ) -> Result<UserIdentity, AppError> {
        let token = bearer_token(authorization)?;

        let identity = self
            .sessions
            .parse_access(token)
            .and_then(|claims| claims.identity())
            .map_err(|e| AppError::with_source(ErrorKind::Unauthorized, "Invalid access token", e))?;

        let role = identity.role_id.to_string();
        let allowed = self
            .enforcer
            .enforce(&role, path, method)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Policy evaluation failed", e))?;

        if !allowed {
            debug!(
                user_id = identity.user_id,
                role_id = identity.role_id,
                path,
                method,
                "Request denied by policy"
            );
            return Err(AppError::forbidden(format!(
                "Role {role} may not {method} {path}"
            )));
        }

        Ok(identity)
    }
}
