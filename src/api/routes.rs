use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware, require_bearer};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    // Everything under /reco requires the bearer token, including unmatched paths
    let reco = Router::new()
        .route("/:model_name/:user_id", get(handlers::get_reco))
        .fallback(handlers::reco_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/reco", reco)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
