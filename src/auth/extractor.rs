//! Bearer-token extractor for axum handlers.

use super::{AuthError, CallerIdentity};
use crate::{errors::AppError, state::AppState};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

/// The authenticated caller of the current request.
///
/// Handlers that take this extractor reject requests without a valid bearer
/// token before any service code runs.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub CallerIdentity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AuthError::Unauthorized("missing or malformed bearer token".into())
        })?;

        let identity = state.auth.authenticate(&token).await?;
        Ok(CurrentUser(identity))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
