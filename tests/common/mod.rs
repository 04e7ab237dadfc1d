#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use casting_agency::{app, ensure_schema, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build the full application router (schema ensured) against the given
/// per-test database pool. Mirrors the router construction in `main.rs` so
/// tests exercise the same middleware stack production uses.
pub async fn build_test_app(pool: PgPool) -> Router {
    ensure_schema(&pool).await.expect("schema setup");
    app(AppState { pool })
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: Body,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let request = builder.body(body).expect("request");
    app.oneshot(request).await.expect("response")
}

/// GET with a JSON content type (selects the JSON response branch).
pub async fn get_json(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Some("application/json"), Body::empty()).await
}

/// GET with no content type (selects the HTML response branch).
pub async fn get_html(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, Body::empty()).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(
        app,
        Method::POST,
        uri,
        Some("application/json"),
        Body::from(body.to_string()),
    )
    .await
}

/// POST a form-encoded body, e.g. `"name=A&age=30&gender=Male"`.
pub async fn post_form(app: Router, uri: &str, body: &str) -> Response {
    send(
        app,
        Method::POST,
        uri,
        Some("application/x-www-form-urlencoded"),
        Body::from(body.to_string()),
    )
    .await
}

pub async fn delete_json(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, Some("application/json"), Body::empty()).await
}

pub async fn body_json(res: Response) -> Value {
    let bytes = res.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_string(res: Response) -> String {
    let bytes = res.into_body().collect().await.expect("body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}
