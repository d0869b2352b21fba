//! Request Extractors

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::entity::identity::VerifiedIdentity;
use crate::error::AuthError;

/// Identity attached by the request gate
///
/// Only valid in handlers mounted under a protected path. Its absence means
/// the route was wired outside the gate and yields a 500.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub VerifiedIdentity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::MissingIdentity)
    }
}
