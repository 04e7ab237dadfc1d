//! Response-mapping middleware for the HTML branch.

use crate::extractors::declares_json;
use crate::pages;
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Swap the JSON error envelope for a dedicated error page on 404/500 when
/// the request did not declare a JSON content type. JSON clients always keep
/// the envelope.
pub async fn html_error_pages(req: Request, next: Next) -> Response {
    let wants_html = !declares_json(req.headers());
    let res = next.run(req).await;
    if !wants_html {
        return res;
    }
    match res.status() {
        StatusCode::NOT_FOUND => (StatusCode::NOT_FOUND, pages::error_404()).into_response(),
        StatusCode::INTERNAL_SERVER_ERROR => {
            (StatusCode::INTERNAL_SERVER_ERROR, pages::error_500()).into_response()
        }
        _ => res,
    }
}
