//! Standard response envelopes.
//!
//! Success bodies carry `success: true` plus a resource-named key, e.g.
//! `{"success": true, "actors": [...]}` for a list or
//! `{"success": true, "actor": [...], "total": 7}` for a create. The resource
//! key varies per route, so bodies are assembled as JSON maps rather than
//! fixed structs.

use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};

fn success(key: &str, value: Value) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    body.insert(key.to_string(), value);
    body
}

/// List body: `{success, <plural>: rows}`.
pub fn records_body(key: &str, rows: Vec<Value>) -> Json<Value> {
    Json(Value::Object(success(key, Value::Array(rows))))
}

/// Search body: `{success, total, <plural>: rows}`.
pub fn search_body(key: &str, rows: Vec<Value>) -> Json<Value> {
    let total = rows.len();
    let mut body = success(key, Value::Array(rows));
    body.insert("total".to_string(), Value::from(total));
    Json(Value::Object(body))
}

/// Single-record body: `{success, <singular>: [row]}`. The record is wrapped
/// in a one-element array.
pub fn record_body(key: &str, row: Value) -> Json<Value> {
    Json(Value::Object(success(key, Value::Array(vec![row]))))
}

/// Create body: `{success, <singular>: [row], total}` where `total` is the
/// table's row count after the insert.
pub fn created_body(key: &str, row: Value, total: i64) -> Json<Value> {
    let mut body = success(key, Value::Array(vec![row]));
    body.insert("total".to_string(), Value::from(total));
    Json(Value::Object(body))
}

/// Delete acknowledgment: `{success, <singular>_id: "<id>"}`. The deleted
/// identifier is echoed as a string.
pub fn deleted_body(id_key: &str, id: &str) -> Json<Value> {
    Json(Value::Object(success(id_key, Value::String(id.to_string()))))
}

/// Error envelope body for a status code. Message text is fixed per status.
pub fn error_body(status: StatusCode) -> Value {
    let message = match status {
        StatusCode::BAD_REQUEST => "bad request",
        StatusCode::UNAUTHORIZED => "unathorized",
        StatusCode::NOT_FOUND => "resource not found",
        StatusCode::METHOD_NOT_ALLOWED => "method not allowed",
        StatusCode::UNPROCESSABLE_ENTITY => "unprocessable",
        _ => "internal server error",
    };
    serde_json::json!({
        "success": false,
        "error": status.as_u16(),
        "message": message
    })
}
