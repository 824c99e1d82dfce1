//! Session middleware configuration.
//!
//! Sessions live in `PostgreSQL` when a database URL is configured and in
//! process memory otherwise. Either way the cookie only carries a signed
//! session ID (SameSite=Strict, 24hr inactivity expiry).

use std::time::Duration;

use axum::Router;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{ExpiredDeletion, Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::{ConfigError, PanelConfig};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cephas_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// How often expired rows are purged from the `PostgreSQL` store.
const EXPIRED_SESSION_SWEEP: Duration = Duration::from_secs(60 * 60);

/// Where sessions are stored.
#[derive(Debug, Clone)]
pub enum SessionBackend {
    Memory(MemoryStore),
    Postgres(PostgresStore),
}

impl SessionBackend {
    /// Pick the backend from configuration, connecting to `PostgreSQL` if a
    /// database URL is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached.
    pub async fn connect(config: &PanelConfig) -> Result<Self, sqlx::Error> {
        match &config.database_url {
            Some(url) => {
                let pool = PgPool::connect(url.expose_secret()).await?;
                tracing::info!("Using PostgreSQL session store");
                Ok(Self::Postgres(PostgresStore::new(pool)))
            }
            None => {
                tracing::info!("Using in-memory session store");
                Ok(Self::Memory(MemoryStore::default()))
            }
        }
    }

    /// Spawn the expired-session sweeper. Only the `PostgreSQL` store needs
    /// one; the memory store drops expired records on access.
    pub fn spawn_sweeper(&self) {
        if let Self::Postgres(store) = self {
            let store = store.clone();
            tokio::spawn(async move {
                if let Err(e) = store.continuously_delete_expired(EXPIRED_SESSION_SWEEP).await {
                    tracing::error!(error = %e, "Expired session sweeper stopped");
                }
            });
        }
    }

    /// Wrap `router` in the session layer for this backend.
    pub fn apply<S>(self, router: Router<S>, config: &PanelConfig, key: Key) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match self {
            Self::Memory(store) => with_sessions(router, store, config, key),
            Self::Postgres(store) => with_sessions(router, store, config, key),
        }
    }
}

/// Derive the cookie signing key from the session secret.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` if the secret is too short to be a
/// signing key.
pub fn session_key(config: &PanelConfig) -> Result<Key, ConfigError> {
    Key::try_from(config.session_secret.expose_secret().as_bytes()).map_err(|e| {
        ConfigError::InsecureSecret("CEPHAS_SESSION_SECRET".to_string(), e.to_string())
    })
}

fn with_sessions<S, Store>(
    router: Router<S>,
    store: Store,
    config: &PanelConfig,
    key: Key,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Store: SessionStore + Clone,
{
    router.layer(
        SessionManagerLayer::new(store)
            .with_name(SESSION_COOKIE_NAME)
            .with_expiry(Expiry::OnInactivity(
                tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
            ))
            .with_secure(config.secure_cookies())
            .with_same_site(SameSite::Strict)
            .with_http_only(true)
            .with_path("/")
            .with_signed(key),
    )
}
