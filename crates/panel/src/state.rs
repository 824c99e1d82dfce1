//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use cephas_core::navigation::RouteManifest;

use crate::api::{ApiError, TrackerApiClient};
use crate::config::PanelConfig;
use crate::models::CurrentUser;
use crate::services::{Workspace, WorkspaceStore};

/// Workspaces idle this long are dropped and re-fetched on next use.
const WORKSPACE_IDLE: Duration = Duration::from_secs(12 * 60 * 60);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PanelConfig,
    api: TrackerApiClient,
    workspaces: WorkspaceStore,
    manifest: RouteManifest,
}

impl AppState {
    /// Build state with the standard route manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be created.
    pub fn new(config: PanelConfig) -> Result<Self, ApiError> {
        Self::with_manifest(config, RouteManifest::standard())
    }

    /// Build state with a custom route manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be created.
    pub fn with_manifest(config: PanelConfig, manifest: RouteManifest) -> Result<Self, ApiError> {
        let api = TrackerApiClient::new(&config.api)?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                workspaces: WorkspaceStore::new(WORKSPACE_IDLE),
                manifest,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &TrackerApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn workspaces(&self) -> &WorkspaceStore {
        &self.inner.workspaces
    }

    #[must_use]
    pub fn manifest(&self) -> &RouteManifest {
        &self.inner.manifest
    }

    /// The user's workspace, bootstrapping it if none is live.
    ///
    /// Returns `None` for users without a recognized role; they have no
    /// readable collections.
    pub async fn workspace(&self, user: &CurrentUser) -> Option<Arc<Workspace>> {
        let role = user.role()?;
        Some(
            self.workspaces()
                .open(
                    &user.id,
                    role,
                    user.api_token(),
                    self.api(),
                    &self.config().poll,
                )
                .await,
        )
    }
}
