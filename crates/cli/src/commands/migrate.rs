//! Session store migrations.
//!
//! The panel keeps no data of its own; the only schema it needs is the
//! `tower_sessions` table behind the `PostgreSQL` session store.
//!
//! # Environment Variables
//!
//! - `CEPHAS_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn database_url() -> Result<SecretString, MigrationError> {
    std::env::var("CEPHAS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("CEPHAS_DATABASE_URL"))
}

/// Create the session store schema and table if they do not exist.
///
/// # Errors
///
/// Returns an error if no database URL is set or the database rejects the
/// migration.
pub async fn sessions() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();
    let url = database_url()?;

    tracing::info!("Connecting to session database...");
    let pool = PgPool::connect(url.expose_secret()).await?;

    tracing::info!("Creating session store table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Session store migration complete");
    Ok(())
}
