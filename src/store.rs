//! Record Store: persistence operations for actor/movie rows.
//!
//! Rows travel as JSON objects (`id` as a number, every other column as
//! text). Identifiers in SQL come from the static entity model only; values
//! are always bound as parameters. Each mutating operation runs in its own
//! transaction: commit on success, rollback on any failure, and the pooled
//! connection is released on every exit path.

use crate::error::AppError;
use crate::model::EntityDef;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{ConnectOptions, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;

pub const ITEMS_PER_PAGE: usize = 10;

pub struct RecordStore;

impl RecordStore {
    /// All rows, ordered by id.
    pub async fn fetch_all(pool: &PgPool, entity: &EntityDef) -> Result<Vec<Value>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            select_columns(entity),
            entity.table_name
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql).fetch_all(pool).await?;
        Ok(rows.iter().map(|r| row_to_json(entity, r)).collect())
    }

    /// One row by exact primary-key equality.
    pub async fn fetch_by_id(
        pool: &PgPool,
        entity: &EntityDef,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            select_columns(entity),
            entity.table_name
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
        Ok(row.map(|r| row_to_json(entity, &r)))
    }

    /// Rows whose search column contains `term`, case-insensitive and
    /// unanchored (`ILIKE '%term%'`). Callers reject empty terms.
    pub async fn filter_by_substring(
        pool: &PgPool,
        entity: &EntityDef,
        term: &str,
    ) -> Result<Vec<Value>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ILIKE '%' || $1 || '%' ORDER BY id",
            select_columns(entity),
            entity.table_name,
            entity.search_column
        );
        tracing::debug!(sql = %sql, term, "query");
        let rows = sqlx::query(&sql).bind(term).fetch_all(pool).await?;
        Ok(rows.iter().map(|r| row_to_json(entity, r)).collect())
    }

    pub async fn count_all(pool: &PgPool, entity: &EntityDef) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", entity.table_name);
        let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await?;
        Ok(count)
    }

    /// Insert a new row; the id is assigned by the database. Returns the
    /// created row.
    pub async fn create(
        pool: &PgPool,
        entity: &EntityDef,
        fields: &HashMap<String, String>,
    ) -> Result<Value, AppError> {
        let sql = insert_sql(entity);
        tracing::debug!(sql = %sql, "insert");
        let mut tx = pool.begin().await?;
        let mut query = sqlx::query(&sql);
        for name in entity.field_names() {
            query = query.bind(fields.get(name).map(String::as_str));
        }
        let row = query.fetch_one(&mut *tx).await?;
        tx.commit().await?;
        Ok(row_to_json(entity, &row))
    }

    /// Overwrite every non-id column of an existing row. Returns the updated
    /// row, or `None` when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        entity: &EntityDef,
        id: i64,
        fields: &HashMap<String, String>,
    ) -> Result<Option<Value>, AppError> {
        let sql = update_sql(entity);
        tracing::debug!(sql = %sql, id, "update");
        let mut tx = pool.begin().await?;
        let mut query = sqlx::query(&sql);
        for name in entity.field_names() {
            query = query.bind(fields.get(name).map(String::as_str));
        }
        let row = query.bind(id).fetch_optional(&mut *tx).await?;
        tx.commit().await?;
        Ok(row.map(|r| row_to_json(entity, &r)))
    }

    /// Remove a row. Returns the deleted row (for messaging), or `None` when
    /// the id does not exist.
    pub async fn delete(
        pool: &PgPool,
        entity: &EntityDef,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 RETURNING {}",
            entity.table_name,
            select_columns(entity)
        );
        tracing::debug!(sql = %sql, id, "delete");
        let mut tx = pool.begin().await?;
        let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *tx).await?;
        tx.commit().await?;
        Ok(row.map(|r| row_to_json(entity, &r)))
    }
}

/// Slice one page out of an already-fetched row set. The listing routes do
/// not use this; pagination was never wired to them.
pub fn paginate(rows: &[Value], page: usize) -> &[Value] {
    let page = page.max(1);
    let start = (page - 1) * ITEMS_PER_PAGE;
    if start >= rows.len() {
        return &[];
    }
    let end = (start + ITEMS_PER_PAGE).min(rows.len());
    &rows[start..end]
}

fn select_columns(entity: &EntityDef) -> String {
    let mut cols = vec!["id"];
    cols.extend(entity.field_names());
    cols.join(", ")
}

fn insert_sql(entity: &EntityDef) -> String {
    let cols: Vec<&str> = entity.field_names().collect();
    let placeholders: Vec<String> = (1..=cols.len()).map(|n| format!("${}", n)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        entity.table_name,
        cols.join(", "),
        placeholders.join(", "),
        select_columns(entity)
    )
}

fn update_sql(entity: &EntityDef) -> String {
    let sets: Vec<String> = entity
        .field_names()
        .enumerate()
        .map(|(i, name)| format!("{} = ${}", name, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
        entity.table_name,
        sets.join(", "),
        sets.len() + 1,
        select_columns(entity)
    )
}

fn row_to_json(entity: &EntityDef, row: &PgRow) -> Value {
    let mut map = Map::new();
    let id = row
        .try_get::<i64, _>("id")
        .map(Value::from)
        .unwrap_or(Value::Null);
    map.insert("id".to_string(), id);
    for name in entity.field_names() {
        let v: Option<String> = row.try_get(name).ok().flatten();
        map.insert(name.to_string(), v.map(Value::String).unwrap_or(Value::Null));
    }
    Value::Object(map)
}

/// Create the two entity tables if they do not exist. Ids are
/// database-assigned; every other column is free-form text.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    for entity in crate::model::ALL {
        let cols: Vec<String> = entity
            .field_names()
            .map(|name| format!("{} TEXT", name))
            .collect();
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (id BIGSERIAL PRIMARY KEY, {})",
            entity.table_name,
            cols.join(", ")
        );
        sqlx::query(&ddl).execute(pool).await?;
    }
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects
/// to the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
