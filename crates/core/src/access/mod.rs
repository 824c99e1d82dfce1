//! The role gate: who may see which route, which dashboard each role gets,
//! and which collections each role may read.

mod gate;
pub mod permissions;

pub use gate::{
    Access, DashboardKind, GateState, Identity, LOGIN_PATH, PublicPage, RouteTarget,
    UNAUTHORIZED_PATH, authorize, classify, dashboard_for, resolve_dashboard,
};
pub use permissions::{Resource, can_read, readable_collections};

/// Errors raised by the role gate.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The stored role is missing or not one of the known roles.
    #[error("unknown role: {0:?}")]
    UnknownRole(String),
}
