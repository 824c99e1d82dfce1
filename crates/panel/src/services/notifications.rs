//! Background notification polling.
//!
//! Every signed-in user with a live workspace has one poller task. It
//! refreshes the notification collection on a fixed interval. A failed
//! fetch is retried with linear backoff (`attempt * backoff_step`); once the
//! retries are exhausted the collection is emptied and carries the error
//! until the next successful poll.

use std::sync::Weak;

use cephas_core::{Notification, TrackerState};
use secrecy::SecretString;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::instrument;

use super::workspace::Workspace;
use crate::api::{ApiError, TrackerSource};
use crate::config::PollConfig;

/// Handle to a running poller. Dropping it stops the poller.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Whether the poller task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Fetch notifications, retrying failures with linear backoff.
///
/// # Errors
///
/// Returns the last error once `max_retries` retries have failed.
pub async fn fetch_with_retry<S: TrackerSource>(
    source: &S,
    token: &SecretString,
    poll: &PollConfig,
) -> Result<Vec<Notification>, ApiError> {
    let mut attempt: u32 = 0;
    loop {
        match source.fetch_all::<Notification>(token).await {
            Ok(items) => return Ok(items),
            Err(err) if attempt < poll.max_retries => {
                attempt += 1;
                let delay = poll.backoff_step * attempt;
                tracing::debug!(
                    attempt,
                    error = %err,
                    ?delay,
                    "Notification fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Run one poll cycle and store the outcome. Returns whether it succeeded.
#[instrument(skip_all)]
pub async fn poll_once<S: TrackerSource>(
    source: &S,
    token: &SecretString,
    poll: &PollConfig,
    state: &RwLock<TrackerState>,
) -> bool {
    match fetch_with_retry(source, token, poll).await {
        Ok(items) => {
            state.write().await.notifications.replace(items);
            true
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                retries = poll.max_retries,
                "Notification polling gave up"
            );
            state
                .write()
                .await
                .notifications
                .reset_with_error(err.to_string());
            false
        }
    }
}

/// Spawn the poller for a workspace.
///
/// The task only holds a weak reference and ends on the first tick after
/// the workspace is gone. The first poll happens one interval from now;
/// bootstrap has just loaded notifications.
pub fn spawn_poller<S: TrackerSource>(
    workspace: Weak<Workspace>,
    source: S,
    poll: PollConfig,
) -> PollerHandle {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + poll.interval, poll.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(workspace) = workspace.upgrade() else {
                break;
            };
            poll_once(&source, workspace.token(), &poll, workspace.state()).await;
        }

        tracing::debug!("Notification poller stopped");
    });

    PollerHandle { task }
}
