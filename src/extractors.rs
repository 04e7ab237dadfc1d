//! Response-mode detection and dual-format body extraction.
//!
//! Every handler applies the same binary switch: a request that declares
//! `Content-Type: application/json` is served JSON end to end; anything else
//! is treated as a form submission and answered with a rendered page.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{Form, FromRequest, FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap},
    Json,
};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::convert::Infallible;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Json,
    Html,
}

impl Mode {
    pub fn of(headers: &HeaderMap) -> Mode {
        if declares_json(headers) {
            Mode::Json
        } else {
            Mode::Html
        }
    }

    pub fn is_json(self) -> bool {
        self == Mode::Json
    }
}

/// True when the request declares a JSON content type.
pub fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequestParts<S> for Mode
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Mode::of(&parts.headers))
    }
}

/// Body fields from either channel, canonicalized to a flat string map.
///
/// JSON objects keep string values as-is and stringify numbers and booleans;
/// arrays (multi-selects) are joined with ", "; nulls are dropped. Form
/// bodies join repeated keys the same way, so a multi-select `gender` field
/// arrives identically from both channels.
pub struct Payload {
    pub mode: Mode,
    pub fields: HashMap<String, String>,
}

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mode = Mode::of(req.headers());
        let fields = match mode {
            Mode::Json => {
                let Json(value) = Json::<Value>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                canonicalize_json(value)?
            }
            Mode::Html => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                canonicalize_form(pairs)
            }
        };
        Ok(Payload { mode, fields })
    }
}

fn canonicalize_json(value: Value) -> Result<HashMap<String, String>, AppError> {
    let map = match value {
        Value::Object(map) => map,
        _ => return Err(AppError::BadRequest("body must be a JSON object".into())),
    };
    let mut fields = HashMap::new();
    for (k, v) in map {
        let s = match v {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Null | Value::Object(_) => continue,
        };
        fields.insert(k, s);
    }
    Ok(fields)
}

fn canonicalize_form(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut fields: HashMap<String, String> = HashMap::new();
    for (k, v) in pairs {
        match fields.entry(k) {
            Entry::Occupied(mut e) => {
                let existing = e.get_mut();
                if !existing.is_empty() && !v.is_empty() {
                    existing.push_str(", ");
                }
                existing.push_str(&v);
            }
            Entry::Vacant(e) => {
                e.insert(v);
            }
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    #[test]
    fn json_content_type_selects_json_mode() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert_eq!(Mode::of(&headers), Mode::Json);

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert_eq!(Mode::of(&headers), Mode::Json);
    }

    #[test]
    fn anything_else_selects_html_mode() {
        assert_eq!(Mode::of(&HeaderMap::new()), Mode::Html);

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert_eq!(Mode::of(&headers), Mode::Html);
    }

    #[test]
    fn json_values_are_stringified() {
        let fields = canonicalize_json(json!({
            "name": "Jackie Chan",
            "age": 69,
            "gender": ["Male", "Other"],
            "image_link": null
        }))
        .unwrap();
        assert_eq!(fields["name"], "Jackie Chan");
        assert_eq!(fields["age"], "69");
        assert_eq!(fields["gender"], "Male, Other");
        assert!(!fields.contains_key("image_link"));
    }

    #[test]
    fn non_object_json_body_is_rejected() {
        assert!(canonicalize_json(json!(["a", "b"])).is_err());
    }

    #[test]
    fn repeated_form_keys_are_joined() {
        let fields = canonicalize_form(vec![
            ("name".into(), "A".into()),
            ("gender".into(), "Male".into()),
            ("gender".into(), "Other".into()),
        ]);
        assert_eq!(fields["gender"], "Male, Other");
        assert_eq!(fields["name"], "A");
    }
}
