//! Bearer-token extractors.
//!
//! `AuthenticatedUser` rejects anonymous requests; `MaybeUser` treats a
//! missing header as an anonymous caller but still rejects garbage
//! tokens. Rejections use 403 to match the legacy API contract.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::modules::auth::{jwt, CurrentUser};

pub struct AuthenticatedUser(pub CurrentUser);

pub struct MaybeUser(pub Option<CurrentUser>);

pub enum AuthError {
    MissingAuthHeader,
    InvalidAuthHeaderFormat,
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingAuthHeader => {
                "Authentication credentials were not provided.".to_string()
            }
            AuthError::InvalidAuthHeaderFormat => {
                "Invalid Authorization header format. Expected: Bearer <token>".to_string()
            }
            AuthError::InvalidToken(e) => format!("Invalid token: {e}"),
        };
        (StatusCode::FORBIDDEN, Json(json!({ "detail": message }))).into_response()
    }
}

fn user_from_parts(parts: &Parts) -> Result<CurrentUser, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeaderFormat)?;

    let token_data =
        jwt::validate_token(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    CurrentUser::from_claims(&token_data.claims)
        .ok_or_else(|| AuthError::InvalidToken("malformed subject".to_string()))
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_from_parts(parts).map(AuthenticatedUser)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if parts.headers.get(AUTHORIZATION).is_none() {
            return Ok(MaybeUser(None));
        }
        user_from_parts(parts).map(|user| MaybeUser(Some(user)))
    }
}
