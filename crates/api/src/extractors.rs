//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use inkpost_common::AppError;
use inkpost_core::{AdminCapability, Identity};
use inkpost_db::entities::user;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl AuthUser {
    /// Caller identity for service calls.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::from(&self.0)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Authenticated administrator extractor.
///
/// Performs the role check once per request and hands the resulting
/// capability to the handler.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user: user::Model,
    pub capability: AdminCapability,
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        let capability = Identity::from(&user).require_admin()?;
        Ok(Self { user, capability })
    }
}
