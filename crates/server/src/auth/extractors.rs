use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::{AppError, Papel};

use super::jwt::Claims;

/// Extractor that requires authentication. Returns 401 if no valid token.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Resolve the acting role from JWT claims. Unauthenticated requests and
/// unknown role strings fall back to the read-only Consulta role; the
/// stage capability gate rejects them from there.
pub struct Actor(pub Papel);

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let papel = parts
            .extensions
            .get::<Claims>()
            .map(|c| Papel::from_str_or_default(&c.papel))
            .unwrap_or(Papel::Consulta);
        Ok(Actor(papel))
    }
}
