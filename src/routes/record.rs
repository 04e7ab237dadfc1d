//! Record CRUD routes.
//!
//! Parameterized paths: handlers resolve the entity from the `:resource`
//! segment ("actors" or "movies"). Static segments (`search`, `create`,
//! `edit`) take precedence over the `:id` parameter. Each route carries a
//! method fallback so a wrong method gets the 405 envelope rather than an
//! empty response.

use crate::error::AppError;
use crate::handlers::record::{
    create, destroy, edit_form, home, list, new_form, search, show, update,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn record_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/:resource", get(list).fallback(method_not_allowed))
        .route("/:resource/search", post(search).fallback(method_not_allowed))
        .route(
            "/:resource/create",
            get(new_form).post(create).fallback(method_not_allowed),
        )
        .route(
            "/:resource/:id",
            get(show).delete(destroy).fallback(method_not_allowed),
        )
        .route(
            "/:resource/:id/edit",
            get(edit_form).post(update).fallback(method_not_allowed),
        )
        .with_state(state)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
