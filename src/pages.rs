//! Minimal server-rendered pages.
//!
//! The real site's templates and static assets are an external collaborator;
//! these shells carry the data, the forms, and the flash text so the HTML
//! branch of every route stays exercisable end to end.

use crate::model::EntityDef;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

pub const FLASH_COOKIE: &str = "flash";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn field(row: &Value, name: &str) -> String {
    match row.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn layout(title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let flash_html = flash
        .map(|m| format!("<p class=\"flash\">{}</p>", escape(m)))
        .unwrap_or_default();
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body><nav><a href=\"/\">Home</a> <a href=\"/actors\">Actors</a> \
         <a href=\"/movies\">Movies</a></nav>{}{}</body></html>",
        escape(title),
        flash_html,
        body
    ))
}

pub fn home(flash: Option<&str>) -> Html<String> {
    layout(
        "Casting Agency",
        flash,
        "<h1>Casting Agency</h1><p>Manage actors and movies.</p>",
    )
}

pub fn list_page(entity: &EntityDef, rows: &[Value], flash: Option<&str>) -> Html<String> {
    let items: String = rows
        .iter()
        .map(|row| {
            format!(
                "<li><a href=\"/{}/{}\">{}</a></li>",
                entity.path_segment,
                field(row, "id"),
                escape(&field(row, entity.display_column))
            )
        })
        .collect();
    let title = format!("{}s", entity.label);
    let body = format!(
        "<h1>{}</h1><ul>{}</ul><p><a href=\"/{}/create\">New {}</a></p>",
        title, items, entity.path_segment, entity.label
    );
    layout(&title, flash, &body)
}

pub fn search_page(entity: &EntityDef, term: &str, rows: &[Value]) -> Html<String> {
    let items: String = rows
        .iter()
        .map(|row| {
            format!(
                "<li><a href=\"/{}/{}\">{}</a></li>",
                entity.path_segment,
                field(row, "id"),
                escape(&field(row, entity.display_column))
            )
        })
        .collect();
    let body = format!(
        "<h1>Found {} result(s) for \"{}\"</h1><ul>{}</ul>",
        rows.len(),
        escape(term),
        items
    );
    layout("Search", None, &body)
}

pub fn show_page(entity: &EntityDef, row: &Value, flash: Option<&str>) -> Html<String> {
    let rows_html: String = entity
        .field_names()
        .map(|name| {
            format!(
                "<dt>{}</dt><dd>{}</dd>",
                name,
                escape(&field(row, name))
            )
        })
        .collect();
    let title = format!("{} {}", entity.label, field(row, "id"));
    let body = format!(
        "<h1>{}</h1><dl>{}</dl><p><a href=\"/{}/{}/edit\">Edit</a></p>",
        escape(&field(row, entity.display_column)),
        rows_html,
        entity.path_segment,
        field(row, "id")
    );
    layout(&title, flash, &body)
}

/// Create/edit form. `row` pre-populates field values when editing.
pub fn form_page(
    entity: &EntityDef,
    action: &str,
    row: Option<&Value>,
    flash: Option<&str>,
) -> Html<String> {
    let inputs: String = entity
        .fields
        .iter()
        .map(|f| {
            let current = row.map(|r| field(r, f.name)).unwrap_or_default();
            match f.rule.allowed {
                Some(choices) => {
                    let options: String = choices
                        .iter()
                        .map(|c| {
                            let selected = if current.split(',').any(|t| t.trim() == *c) {
                                " selected"
                            } else {
                                ""
                            };
                            format!("<option value=\"{}\"{}>{}</option>", c, selected, c)
                        })
                        .collect();
                    format!(
                        "<label>{0}<select name=\"{0}\" multiple>{1}</select></label>",
                        f.name, options
                    )
                }
                None => format!(
                    "<label>{0}<input name=\"{0}\" value=\"{1}\"></label>",
                    f.name,
                    escape(&current)
                ),
            }
        })
        .collect();
    let title = match row {
        Some(_) => format!("Edit {}", entity.label),
        None => format!("New {}", entity.label),
    };
    let body = format!(
        "<h1>{}</h1><form method=\"post\" action=\"{}\">{}<button type=\"submit\">Save</button></form>",
        title,
        escape(action),
        inputs
    );
    layout(&title, flash, &body)
}

pub fn error_404() -> Html<String> {
    layout("Not Found", None, "<h1>404</h1><p>Resource not found.</p>")
}

pub fn error_500() -> Html<String> {
    layout(
        "Server Error",
        None,
        "<h1>500</h1><p>Something went wrong. Please try again.</p>",
    )
}

/// Redirect that carries a flash message in a cookie; the next rendered page
/// displays and clears it.
pub fn flash_redirect(location: &str, message: &str) -> Response {
    let cookie = format!("{}={}; Path=/", FLASH_COOKIE, URL_SAFE_NO_PAD.encode(message));
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response()
}

/// Read the flash message from the request's cookies, if any.
pub fn take_flash(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in raw.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(FLASH_COOKIE).and_then(|r| r.strip_prefix('=')) {
            let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
            return String::from_utf8(bytes).ok();
        }
    }
    None
}

/// Turn a page into a response, clearing the flash cookie when one was shown.
pub fn rendered(page: Html<String>, clear_flash: bool) -> Response {
    let mut res = page.into_response();
    if clear_flash {
        res.headers_mut().insert(
            header::SET_COOKIE,
            HeaderValue::from_static("flash=; Path=/; Max-Age=0"),
        );
    }
    res
}
