use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{ModelName, RecoResponse, UserId};

use super::AppState;

pub const HEALTH_MESSAGE: &str = "I am alive";

/// Health check endpoint
pub async fn health_check() -> Json<&'static str> {
    Json(HEALTH_MESSAGE)
}

/// Recommendations for a user from the named model
pub async fn get_reco(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((model_name, raw_user_id)): Path<(String, String)>,
) -> AppResult<Json<RecoResponse>> {
    tracing::info!(
        request_id = %request_id,
        model = %model_name,
        user_id = %raw_user_id,
        "Recommendation requested"
    );

    let user_id = parse_user_id(&model_name, &raw_user_id)?;

    let items = state
        .dispatcher
        .dispatch(&model_name, user_id, state.reco_count)
        .await?;

    tracing::info!(
        request_id = %request_id,
        model = %model_name,
        user_id,
        count = items.len(),
        "Recommendations served"
    );

    Ok(Json(RecoResponse { user_id, items }))
}

/// Parses the `{user_id}` segment
///
/// Non-numeric input is invalid. Numbers too large for a `u64` are necessarily above
/// the known-user range and are reported as missing users, after the model name has
/// been validated so that an unknown model still wins.
fn parse_user_id(model_name: &str, raw: &str) -> AppResult<UserId> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::InvalidInput(format!(
            "user_id must be a non-negative integer, got '{}'",
            raw
        )));
    }

    match raw.parse() {
        Ok(user_id) => Ok(user_id),
        Err(_) => {
            model_name.parse::<ModelName>()?;
            Err(AppError::UserNotFound(raw.to_string()))
        }
    }
}

/// Fallback for unmatched paths under `/reco`
pub async fn reco_not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}
