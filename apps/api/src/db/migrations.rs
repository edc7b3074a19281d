use adapt_forms::schema::default_schemas;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use sqlx::{
    migrate::MigrateDatabase, query, query_scalar, sqlite::SqlitePoolOptions, Sqlite, SqlitePool,
};

use crate::db::now;

/// Creates every table that does not exist yet. Safe to run on each start.
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS form_configs (
            form_type TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            fields TEXT NOT NULL DEFAULT '[]',
            submit_button_text TEXT NOT NULL DEFAULT 'Submit',
            success_message TEXT NOT NULL,
            enabled BOOLEAN NOT NULL DEFAULT TRUE,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE TABLE IF NOT EXISTS form_submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            form_type TEXT NOT NULL,
            data TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'new',
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            location TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT 'other',
            image_url TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE TABLE IF NOT EXISTS event_registrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
            data TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'confirmed',
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    query(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // Registration support arrived after the events table.
    ensure_column_exists(
        pool,
        "events",
        "registration_type",
        "ALTER TABLE events ADD COLUMN registration_type TEXT NOT NULL DEFAULT 'none'",
    )
    .await?;
    ensure_column_exists(
        pool,
        "events",
        "registration_url",
        "ALTER TABLE events ADD COLUMN registration_url TEXT",
    )
    .await?;
    ensure_column_exists(
        pool,
        "events",
        "registration_fields",
        "ALTER TABLE events ADD COLUMN registration_fields TEXT",
    )
    .await?;
    ensure_column_exists(
        pool,
        "events",
        "max_registrations",
        "ALTER TABLE events ADD COLUMN max_registrations INTEGER",
    )
    .await?;

    query(
        "CREATE INDEX IF NOT EXISTS idx_submissions_form_type
         ON form_submissions (form_type, created_at)",
    )
    .execute(pool)
    .await?;
    query(
        "CREATE INDEX IF NOT EXISTS idx_registrations_event
         ON event_registrations (event_id, status)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn ensure_column_exists(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    alter_statement: &str,
) -> Result<(), sqlx::Error> {
    let count: i64 = query_scalar(&format!(
        "SELECT COUNT(*) FROM pragma_table_info('{table}') WHERE name = ?",
    ))
    .bind(column)
    .fetch_one(pool)
    .await?;

    if count == 0 {
        query(alter_statement).execute(pool).await?;
    }

    Ok(())
}

/// Installs the built-in form definitions and settings. Existing rows are
/// left untouched, so admin edits survive a re-run.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let timestamp = now();
    let mut inserted = 0;

    for schema in default_schemas() {
        let fields = serde_json::to_string(&schema.fields)
            .map_err(|e| sqlx::Error::Protocol(format!("encoding seed fields: {e}")))?;
        let result = query(
            "INSERT INTO form_configs
                (form_type, title, description, fields, submit_button_text, success_message, enabled, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(form_type) DO NOTHING",
        )
        .bind(&schema.form_type)
        .bind(&schema.title)
        .bind(&schema.description)
        .bind(fields)
        .bind(&schema.submit_button_text)
        .bind(&schema.success_message)
        .bind(schema.enabled)
        .bind(&timestamp)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    let result = query(
        "INSERT INTO settings (key, value, updated_at) VALUES ('donation_url', '', ?)
         ON CONFLICT(key) DO NOTHING",
    )
    .bind(&timestamp)
    .execute(pool)
    .await?;
    inserted += result.rows_affected();

    Ok(inserted)
}

/// Opens (creating if needed) the database at `database_url`, applies the
/// schema and seeds defaults.
pub async fn create_database_pool(database_url: &str) -> Result<SqlitePool> {
    if database_url == "sqlite::memory:" {
        return create_memory_pool()
            .await
            .map_err(|e| eyre!("Failed to open in-memory database: {e}"));
    }

    tracing::info!(%database_url, "initializing database");

    let exists = Sqlite::database_exists(database_url)
        .await
        .map_err(|e| eyre!("Error checking database: {e}"))?;
    if !exists {
        tracing::info!("database does not exist, creating it");
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| eyre!("Failed to create SQLite database: {e}"))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA foreign_keys = ON;").await?;
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
        .map_err(|e| eyre!("Failed to connect to SQLite database: {e}"))?;

    setup_database(&pool)
        .await
        .map_err(|e| eyre!("Failed to set up database schema: {e}"))?;
    let seeded = seed_defaults(&pool)
        .await
        .map_err(|e| eyre!("Failed to seed defaults: {e}"))?;
    tracing::info!(seeded, "database ready");

    Ok(pool)
}

/// A migrated and seeded private database.
///
/// Each connection to `sqlite::memory:` opens a separate database, so the
/// pool is capped at a single connection.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA foreign_keys = ON;").await?;
                Ok(())
            })
        })
        .connect("sqlite::memory:")
        .await?;
    setup_database(&pool).await?;
    seed_defaults(&pool).await?;
    Ok(pool)
}
