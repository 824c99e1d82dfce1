//! Business logic between the HTTP layer and the tracker API.

pub mod bootstrap;
pub mod dashboard;
pub mod notifications;
pub mod workspace;

pub use bootstrap::{BootstrapReport, FailedFetch, bootstrap};
pub use dashboard::{DashboardView, build_dashboard};
pub use notifications::{PollerHandle, poll_once, spawn_poller};
pub use workspace::{Workspace, WorkspaceStore};
