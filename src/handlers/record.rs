//! Record handlers: list, search, show, create, update, delete.
//!
//! One generic handler per action, resolved by the resource path segment
//! ("actors" or "movies"). Each applies the same content-negotiation switch:
//! a JSON content type means JSON in and JSON out; anything else reads form
//! fields and renders a page.

use crate::error::AppError;
use crate::extractors::{Mode, Payload};
use crate::model::{entity_by_path, EntityDef};
use crate::pages;
use crate::response;
use crate::service::RecordValidator;
use crate::state::AppState;
use crate::store::RecordStore;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

fn resolve(path_segment: &str) -> Result<&'static EntityDef, AppError> {
    entity_by_path(path_segment).ok_or_else(|| AppError::NotFound(path_segment.to_string()))
}

fn display_name(entity: &EntityDef, row: &Value) -> String {
    row.get(entity.display_column)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Home page. Shows and clears any pending flash message.
pub async fn home(headers: HeaderMap) -> Response {
    let flash = pages::take_flash(&headers);
    pages::rendered(pages::home(flash.as_deref()), flash.is_some())
}

/// GET /{resource} — all records, ordered by id.
pub async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    mode: Mode,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let entity = resolve(&resource)?;
    let rows = RecordStore::fetch_all(&state.pool, entity).await?;
    if mode.is_json() {
        return Ok(response::records_body(entity.path_segment, rows).into_response());
    }
    let flash = pages::take_flash(&headers);
    Ok(pages::rendered(
        pages::list_page(entity, &rows, flash.as_deref()),
        flash.is_some(),
    ))
}

/// POST /{resource}/search — substring match on the primary text column.
/// A missing or empty trimmed term is a 404, never an empty-result 200.
pub async fn search(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    payload: Payload,
) -> Result<Response, AppError> {
    let entity = resolve(&resource)?;
    let term = payload
        .fields
        .get("search_term")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    if term.is_empty() {
        return Err(AppError::NotFound("search term".into()));
    }
    let rows = RecordStore::filter_by_substring(&state.pool, entity, &term).await?;
    if payload.mode.is_json() {
        return Ok(response::search_body(entity.path_segment, rows).into_response());
    }
    Ok(pages::search_page(entity, &term, &rows).into_response())
}

/// GET /{resource}/{id} — one record. Any lookup failure (unparseable id or
/// missing row) is reported as 422.
pub async fn show(
    State(state): State<AppState>,
    Path((resource, id_str)): Path<(String, String)>,
    mode: Mode,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let entity = resolve(&resource)?;
    let id: i64 = id_str
        .parse()
        .map_err(|_| AppError::Unprocessable(format!("invalid id '{}'", id_str)))?;
    let row = RecordStore::fetch_by_id(&state.pool, entity, id)
        .await
        .map_err(|e| AppError::Unprocessable(e.to_string()))?
        .ok_or_else(|| AppError::Unprocessable(format!("{} {} not found", entity.label, id)))?;
    if mode.is_json() {
        return Ok(response::record_body(entity.singular, row).into_response());
    }
    let flash = pages::take_flash(&headers);
    Ok(pages::rendered(
        pages::show_page(entity, &row, flash.as_deref()),
        flash.is_some(),
    ))
}

/// GET /{resource}/create — empty form.
pub async fn new_form(
    Path(resource): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let entity = resolve(&resource)?;
    let flash = pages::take_flash(&headers);
    let action = format!("/{}/create", entity.path_segment);
    Ok(pages::rendered(
        pages::form_page(entity, &action, None, flash.as_deref()),
        flash.is_some(),
    ))
}

/// POST /{resource}/create — validate, insert, respond.
pub async fn create(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    payload: Payload,
) -> Result<Response, AppError> {
    let entity = resolve(&resource)?;
    let problems = RecordValidator::check(&payload.fields, entity);
    if !problems.is_empty() {
        let message = problems.join("; ");
        if payload.mode.is_json() {
            return Err(AppError::BadRequest(message));
        }
        let back = format!("/{}/create", entity.path_segment);
        return Ok(pages::flash_redirect(&back, &format!("Errors: {}", message)));
    }

    let row = RecordStore::create(&state.pool, entity, &payload.fields).await?;
    let name = display_name(entity, &row);
    tracing::info!(resource = entity.path_segment, name = %name, "record created");

    if payload.mode.is_json() {
        let total = RecordStore::count_all(&state.pool, entity).await?;
        return Ok(response::created_body(entity.singular, row, total).into_response());
    }
    let message = format!("{}: {} created successfully!", entity.label, name);
    Ok(pages::rendered(pages::home(Some(&message)), false))
}

/// GET /{resource}/{id}/edit — form pre-populated from the existing record.
pub async fn edit_form(
    State(state): State<AppState>,
    Path((resource, id_str)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let entity = resolve(&resource)?;
    let id: i64 = id_str
        .parse()
        .map_err(|_| AppError::Unprocessable(format!("invalid id '{}'", id_str)))?;
    let row = RecordStore::fetch_by_id(&state.pool, entity, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("{} {} not found", entity.label, id)))?;
    let flash = pages::take_flash(&headers);
    let action = format!("/{}/{}/edit", entity.path_segment, id);
    Ok(pages::rendered(
        pages::form_page(entity, &action, Some(&row), flash.as_deref()),
        flash.is_some(),
    ))
}

/// POST /{resource}/{id}/edit — validate, overwrite fields in place, respond.
pub async fn update(
    State(state): State<AppState>,
    Path((resource, id_str)): Path<(String, String)>,
    payload: Payload,
) -> Result<Response, AppError> {
    let entity = resolve(&resource)?;
    let id: i64 = id_str
        .parse()
        .map_err(|_| AppError::Unprocessable(format!("invalid id '{}'", id_str)))?;
    let problems = RecordValidator::check(&payload.fields, entity);
    if !problems.is_empty() {
        let message = problems.join("; ");
        if payload.mode.is_json() {
            return Err(AppError::BadRequest(message));
        }
        let back = format!("/{}/{}/edit", entity.path_segment, id);
        return Ok(pages::flash_redirect(&back, &format!("Errors: {}", message)));
    }

    let row = RecordStore::update(&state.pool, entity, id, &payload.fields)
        .await?
        .ok_or_else(|| AppError::Internal(format!("{} {} not found", entity.label, id)))?;
    let name = display_name(entity, &row);
    tracing::info!(resource = entity.path_segment, id, name = %name, "record updated");

    if payload.mode.is_json() {
        return Ok(response::record_body(entity.singular, row).into_response());
    }
    let to = format!("/{}/{}", entity.path_segment, id);
    let message = format!("{}: {} updated successfully", entity.label, name);
    Ok(pages::flash_redirect(&to, &message))
}

/// DELETE /{resource}/{id} — remove the record and acknowledge with its id
/// as a string. Any failure, including a missing row, is a 500.
pub async fn destroy(
    State(state): State<AppState>,
    Path((resource, id_str)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let entity = resolve(&resource)?;
    let id: i64 = id_str
        .parse()
        .map_err(|_| AppError::Internal(format!("invalid id '{}'", id_str)))?;
    let row = RecordStore::delete(&state.pool, entity, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("{} {} not found", entity.label, id)))?;
    let name = display_name(entity, &row);
    tracing::info!(resource = entity.path_segment, id, name = %name, "record removed");
    Ok(response::deleted_body(&entity.id_key(), &id_str))
}
