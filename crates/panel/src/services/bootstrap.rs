//! Initial load of every collection a role may read.

use cephas_core::access::{Resource, can_read};
use cephas_core::{
    Building, Collection, CollectionKind, Material, Notification, Order, Project, Role,
    ServiceInstaller, Splitter, Task, TrackerState, User,
};
use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::api::{ApiError, ApiResource, TrackerSource};

/// Outcome of one bootstrap run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// Collections replaced with fresh data.
    pub loaded: Vec<CollectionKind>,
    /// Collections whose fetch failed, with the error text.
    pub failed: Vec<FailedFetch>,
    /// Collections the role may not read.
    pub skipped: Vec<CollectionKind>,
}

/// One failed collection fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFetch {
    pub collection: CollectionKind,
    pub error: String,
}

impl BootstrapReport {
    /// True only if every attempted fetch succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

fn mark_loading(state: &mut TrackerState, role: Role) {
    macro_rules! mark {
        ($($field:ident: $ty:ty),+) => {
            $(
                if permitted::<$ty>(role) {
                    state.$field.start_loading();
                }
            )+
        };
    }
    mark!(
        orders: Order,
        buildings: Building,
        splitters: Splitter,
        materials: Material,
        service_installers: ServiceInstaller,
        tasks: Task,
        projects: Project,
        users: User,
        notifications: Notification
    );
}

fn permitted<T: ApiResource>(role: Role) -> bool {
    can_read(role, Resource::of_collection(T::KIND))
}

async fn fetch_if_permitted<S: TrackerSource, T: ApiResource>(
    source: &S,
    token: &SecretString,
    role: Role,
) -> Option<Result<Vec<T>, ApiError>> {
    if !permitted::<T>(role) {
        return None;
    }
    Some(source.fetch_all::<T>(token).await)
}

fn apply<T: ApiResource>(
    collection: &mut Collection<T>,
    outcome: Option<Result<Vec<T>, ApiError>>,
    report: &mut BootstrapReport,
) {
    match outcome {
        None => report.skipped.push(T::KIND),
        Some(Ok(items)) => {
            collection.replace(items);
            report.loaded.push(T::KIND);
        }
        Some(Err(err)) => {
            tracing::warn!(collection = T::KIND.label(), error = %err, "Collection fetch failed");
            let error = err.to_string();
            collection.fail(error.clone());
            report.failed.push(FailedFetch {
                collection: T::KIND,
                error,
            });
        }
    }
}

/// Fetch every collection `role` may read and write the results into `state`.
///
/// All fetches run concurrently and the function waits for every one of
/// them. Each success replaces its collection; each failure is recorded on
/// its collection and keeps whatever records it already held. The write lock
/// is only taken to mark collections as loading and to store the results,
/// never across a fetch.
#[instrument(skip(source, token, state), fields(role = %role))]
pub async fn bootstrap<S: TrackerSource>(
    source: &S,
    token: &SecretString,
    role: Role,
    state: &RwLock<TrackerState>,
) -> BootstrapReport {
    mark_loading(&mut *state.write().await, role);

    let (
        orders,
        buildings,
        splitters,
        materials,
        installers,
        tasks,
        projects,
        users,
        notifications,
    ) = tokio::join!(
        fetch_if_permitted::<S, Order>(source, token, role),
        fetch_if_permitted::<S, Building>(source, token, role),
        fetch_if_permitted::<S, Splitter>(source, token, role),
        fetch_if_permitted::<S, Material>(source, token, role),
        fetch_if_permitted::<S, ServiceInstaller>(source, token, role),
        fetch_if_permitted::<S, Task>(source, token, role),
        fetch_if_permitted::<S, Project>(source, token, role),
        fetch_if_permitted::<S, User>(source, token, role),
        fetch_if_permitted::<S, Notification>(source, token, role),
    );

    let mut report = BootstrapReport::default();
    {
        let mut state = state.write().await;
        apply(&mut state.orders, orders, &mut report);
        apply(&mut state.buildings, buildings, &mut report);
        apply(&mut state.splitters, splitters, &mut report);
        apply(&mut state.materials, materials, &mut report);
        apply(&mut state.service_installers, installers, &mut report);
        apply(&mut state.tasks, tasks, &mut report);
        apply(&mut state.projects, projects, &mut report);
        apply(&mut state.users, users, &mut report);
        apply(&mut state.notifications, notifications, &mut report);
    }

    if report.is_success() {
        tracing::info!(loaded = report.loaded.len(), "Bootstrap complete");
    } else {
        tracing::warn!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "Bootstrap finished with failures"
        );
    }

    report
}
