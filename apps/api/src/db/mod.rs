pub mod migrations;
pub mod models;
pub mod queries;

use thiserror::Error;

pub use migrations::{create_database_pool, create_memory_pool, seed_defaults, setup_database};

/// Failure reading or writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored JSON could not be read: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Current time as stored in `created_at`/`updated_at`.
pub fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
