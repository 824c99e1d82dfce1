//! Per-user application state.
//!
//! Each signed-in user gets a [`Workspace`]: their [`TrackerState`], the
//! token used to refresh it, and the notification poller feeding it.
//! Workspaces live in a [`WorkspaceStore`] keyed by user ID and are dropped
//! after a period of inactivity or on logout. Dropping a workspace stops its
//! poller.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use cephas_core::access::{Resource, can_read};
use cephas_core::{Role, TrackerState, UserId};
use moka::future::Cache;
use secrecy::SecretString;
use tokio::sync::RwLock;

use super::bootstrap::{BootstrapReport, bootstrap};
use super::notifications::{PollerHandle, spawn_poller};
use crate::api::TrackerSource;
use crate::config::PollConfig;

/// Upper bound on concurrently cached workspaces.
const MAX_WORKSPACES: u64 = 10_000;

/// One signed-in user's state.
pub struct Workspace {
    user_id: UserId,
    role: Role,
    token: SecretString,
    state: RwLock<TrackerState>,
    last_bootstrap: RwLock<BootstrapReport>,
    poller: OnceLock<PollerHandle>,
}

impl Workspace {
    /// Create an empty workspace. Nothing is fetched until
    /// [`refresh`](Self::refresh) runs.
    #[must_use]
    pub fn new(user_id: UserId, role: Role, token: SecretString) -> Arc<Self> {
        Arc::new(Self {
            user_id,
            role,
            token,
            state: RwLock::new(TrackerState::default()),
            last_bootstrap: RwLock::new(BootstrapReport::default()),
            poller: OnceLock::new(),
        })
    }

    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// The user's collections.
    #[must_use]
    pub const fn state(&self) -> &RwLock<TrackerState> {
        &self.state
    }

    /// Report of the most recent bootstrap.
    pub async fn last_bootstrap(&self) -> BootstrapReport {
        self.last_bootstrap.read().await.clone()
    }

    /// Re-fetch every collection the role may read.
    pub async fn refresh<S: TrackerSource>(&self, source: &S) -> BootstrapReport {
        let report = bootstrap(source, &self.token, self.role, &self.state).await;
        self.last_bootstrap.write().await.clone_from(&report);
        report
    }

    /// Start the notification poller. Does nothing if it already runs or the
    /// role may not read notifications.
    pub fn start_polling<S: TrackerSource>(self: &Arc<Self>, source: S, poll: PollConfig) {
        if !can_read(self.role, Resource::Notifications) || self.poller.get().is_some() {
            return;
        }
        let handle = spawn_poller(Arc::downgrade(self), source, poll);
        // A concurrent caller may have won; the losing handle aborts on drop.
        let _ = self.poller.set(handle);
    }

    /// Whether a poller is attached and still running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.get().is_some_and(|handle| !handle.is_finished())
    }
}

/// Cache of live workspaces keyed by user ID.
#[derive(Clone)]
pub struct WorkspaceStore {
    cache: Cache<UserId, Arc<Workspace>>,
}

impl WorkspaceStore {
    /// Create a store that drops workspaces idle for longer than `idle`.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_WORKSPACES)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// The workspace of a user, if one is live.
    pub async fn get(&self, user_id: &UserId) -> Option<Arc<Workspace>> {
        self.cache.get(user_id).await
    }

    /// Return the user's workspace, creating and bootstrapping it first if
    /// none is live for `role`.
    ///
    /// A live workspace built for another role is replaced, so the fetched
    /// collections always match the role the gate checks. Concurrent calls
    /// for the same user share one bootstrap.
    pub async fn open<S>(
        &self,
        user_id: &UserId,
        role: Role,
        token: SecretString,
        source: &S,
        poll: &PollConfig,
    ) -> Arc<Workspace>
    where
        S: TrackerSource + Clone,
    {
        if let Some(existing) = self.cache.get(user_id).await {
            if existing.role() == role {
                return existing;
            }
            tracing::info!(
                user_id = %user_id,
                from = %existing.role(),
                to = %role,
                "Role changed, rebuilding workspace"
            );
            self.cache.invalidate(user_id).await;
        }
        self.cache
            .get_with_by_ref(user_id, async {
                let workspace = Workspace::new(user_id.clone(), role, token);
                workspace.refresh(source).await;
                workspace.start_polling(source.clone(), *poll);
                workspace
            })
            .await
    }

    /// Drop the user's workspace, stopping its poller.
    pub async fn close(&self, user_id: &UserId) {
        self.cache.invalidate(user_id).await;
    }

    /// Number of live workspaces.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }
}
