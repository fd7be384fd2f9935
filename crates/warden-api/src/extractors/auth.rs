//! `AuthUser` extractor: reads the identity the request gate attached.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use warden_core::error::AppError;
use warden_core::types::UserIdentity;

use crate::error::ApiError;

/// Authenticated caller, available in handlers mounted behind the gate.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserIdentity);

impl std::ops::Deref for AuthUser {
    type Target = UserIdentity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserIdentity>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized("Request was not authenticated").into())
    }
}
