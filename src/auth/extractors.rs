use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use super::services::AuthService;
use crate::error::AppError;

/// Extracts and validates the token, returning the user ID. Rejects with
/// 401 when the header is missing or the token is invalid.
pub struct AuthUser(pub Uuid);

/// Like [`AuthUser`] but never rejects: a missing header, a malformed or an
/// expired token all yield `None`, and the request is served anonymously.
pub struct MaybeAuthUser(pub Option<Uuid>);

/// Accepts `Bearer <token>` as well as the bare token.
fn bearer_token(parts: &Parts) -> Option<Result<&str, AppError>> {
    let header = parts.headers.get(AUTHORIZATION)?;
    let Ok(value) = header.to_str() else {
        return Some(Err(AppError::InvalidToken));
    };
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    if token.is_empty() {
        return Some(Err(AppError::InvalidToken));
    }
    Some(Ok(token))
}

fn resolve(parts: &Parts, auth: &AuthService) -> Result<Option<Uuid>, AppError> {
    match bearer_token(parts) {
        None => Ok(None),
        Some(token) => auth.validate_token(token?).map(Some).map_err(|e| {
            warn!("invalid or expired token");
            e
        }),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthService::from_ref(state);
        match resolve(parts, &auth)? {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => {
                warn!("missing Authorization header");
                Err(AppError::InvalidToken)
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    AuthService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthService::from_ref(state);
        Ok(MaybeAuthUser(resolve(parts, &auth).ok().flatten()))
    }
}
