//! Router assembly: record routes, common routes, fallbacks, middleware.

pub mod common;
pub mod record;

use crate::error::AppError;
use crate::middleware::html_error_pages;
use crate::state::AppState;
use axum::{http::HeaderName, middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// The full application router with the production middleware stack. Tests
/// build the same router so they exercise identical behavior.
pub fn app(state: AppState) -> Router {
    let request_id = HeaderName::from_static("x-request-id");
    Router::new()
        .merge(common::common_routes(state.clone()))
        .merge(record::record_routes(state))
        .fallback(not_found)
        .layer(middleware::from_fn(html_error_pages))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

async fn not_found() -> AppError {
    AppError::NotFound("route".into())
}
