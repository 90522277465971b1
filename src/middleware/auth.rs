use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{api::AppState, error::AppError};

/// Extracts the credential from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Rejects requests whose bearer token does not match the configured API key.
///
/// Runs before path extraction, so an invalid token always yields 401.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = match bearer_token(request.headers()) {
        Some(token) => token == &*state.api_key,
        None => {
            tracing::warn!(uri = %request.uri(), "Rejected request without bearer token");
            return Err(AppError::Unauthorized);
        }
    };

    if !authorized {
        tracing::warn!(uri = %request.uri(), "Rejected request with invalid token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
