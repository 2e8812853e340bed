//! Server configuration, state wiring, and migrations.

pub mod config;
pub mod state_builders;

use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

/// Migrations embedded at compile time from `backend/migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The synchronous connection for the migration harness failed.
    #[error("failed to connect for migrations: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to run migrations: {0}")]
    Apply(String),
    /// The blocking task running the harness was cancelled.
    #[error("migration task failed: {0}")]
    Join(String),
}

/// Run pending migrations on a blocking thread.
///
/// The migration harness needs a synchronous connection; everything else
/// in the process uses the async pool.
pub async fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|error| MigrationError::Apply(error.to_string()))?;
        Ok(())
    })
    .await
    .map_err(|error| MigrationError::Join(error.to_string()))?
}
