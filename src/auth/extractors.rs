use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::ApiError;

/// Decide the fate of a request from its raw `Authorization` header value.
/// The bearer token is the second whitespace-separated word; a missing
/// header or missing token rejects as `Unauthorized`, a token that fails
/// verification as `InvalidToken`. No database round-trip is involved.
pub fn authenticate(header: Option<&str>, keys: &JwtKeys) -> Result<Uuid, ApiError> {
    let header = header.ok_or(ApiError::Unauthorized)?;
    let token = header
        .split_whitespace()
        .nth(1)
        .ok_or(ApiError::Unauthorized)?;
    match keys.verify(token) {
        Ok(claims) => Ok(claims.sub),
        Err(reason) => {
            warn!(%reason, "token rejected");
            Err(ApiError::InvalidToken)
        }
    }
}

/// Extracts and validates the bearer token, yielding the caller's user ID.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        authenticate(header, &keys).map(AuthUser)
    }
}
