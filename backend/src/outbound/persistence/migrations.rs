//! Embedded schema migrations.
//!
//! Migrations run once at startup on a dedicated synchronous connection
//! before the pool is built. The same connection switches the database file
//! to WAL journalling, which persists across connections.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while preparing the database schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The database file could not be opened.
    #[error("failed to open database {path}: {message}")]
    Open { path: String, message: String },
    /// A pragma or migration failed.
    #[error("failed to migrate database: {message}")]
    Apply { message: String },
    /// The blocking migration task did not complete.
    #[error("migration task failed: {message}")]
    Task { message: String },
}

fn apply(path: &str) -> Result<usize, MigrationError> {
    let mut conn = SqliteConnection::establish(path).map_err(|err| MigrationError::Open {
        path: path.to_owned(),
        message: err.to_string(),
    })?;
    conn.batch_execute("PRAGMA journal_mode = WAL;")
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}

/// Apply all pending migrations to the database at `path`.
///
/// Returns the number of migrations applied.
///
/// # Errors
///
/// Returns [`MigrationError`] when the file cannot be opened or a migration
/// fails.
pub async fn run_migrations(path: &str) -> Result<usize, MigrationError> {
    let owned = path.to_owned();
    let applied = tokio::task::spawn_blocking(move || apply(&owned))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })??;
    info!(database = path, applied, "database migrations complete");
    Ok(applied)
}
