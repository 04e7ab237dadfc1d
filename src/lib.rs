//! Casting agency demo backend: actors and movies CRUD over JSON and HTML.

pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod model;
pub mod pages;
pub mod response;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;

pub use config::ServerConfig;
pub use error::AppError;
pub use model::{entity_by_path, EntityDef};
pub use response::error_body;
pub use routes::app;
pub use service::RecordValidator;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema, RecordStore};
