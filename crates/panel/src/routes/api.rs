//! JSON endpoints for the panel's own front end.
//!
//! All of them need a signed-in user; signed-out calls get 401 from
//! [`RequireAuth`] instead of a redirect.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use cephas_core::access::{Access, RouteTarget, authorize, resolve_dashboard};
use cephas_core::navigation::{
    ComposedRoute, SidebarItem, build_sidebar, compose_routes, resolve_title,
};
use cephas_core::{Collection, Notification};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::{BootstrapReport, DashboardView};
use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/navigation", get(navigation))
        .route("/api/dashboard", get(dashboard))
        .route("/api/notifications", get(notifications))
        .route("/api/refresh", post(refresh))
}

/// Serializable form of the gate's [`Access`] decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Render { target: RouteTarget },
    Redirect { to: &'static str },
    Unauthorized,
    NotFound,
}

impl From<Access> for GateDecision {
    fn from(access: Access) -> Self {
        match access {
            Access::Render(target) => Self::Render { target },
            Access::Redirect(to) => Self::Redirect { to },
            Access::Unauthorized => Self::Unauthorized,
            Access::NotFound => Self::NotFound,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct NavigationResponse<'a> {
    role: Option<&'a str>,
    path: &'a str,
    title: &'a str,
    sidebar: &'a [SidebarItem],
    routes: Vec<ComposedRoute<'a>>,
    access: GateDecision,
}

/// Sidebar, title, composed routes and gate decision for one path.
///
/// GET /api/navigation?path=/activations/today
#[instrument(skip_all, fields(user_id = %user.id))]
async fn navigation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<NavigationQuery>,
) -> Response {
    let path = query.path.unwrap_or_else(|| "/".to_owned());
    let manifest = state.manifest();
    let role = user.role();
    let sidebar = role
        .map(|role| build_sidebar(manifest, role))
        .unwrap_or_default();
    let routes = role
        .map(|role| compose_routes(manifest, role))
        .unwrap_or_default();

    Json(NavigationResponse {
        role: user.role.as_deref(),
        path: &path,
        title: resolve_title(&sidebar, &path),
        sidebar: &sidebar,
        routes,
        access: authorize(manifest, &path, user.identity()).into(),
    })
    .into_response()
}

/// The signed-in user's dashboard data.
///
/// GET /api/dashboard
#[instrument(skip_all, fields(user_id = %user.id))]
async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<DashboardView>, AppError> {
    let kind = resolve_dashboard(user.role.as_deref())
        .map_err(|err| AppError::Forbidden(err.to_string()))?;
    let (view, _) = super::dashboard::load(&state, &user, kind).await?;
    Ok(Json(view))
}

#[derive(Debug, Serialize)]
struct NotificationsResponse {
    unread: usize,
    #[serde(flatten)]
    notifications: Collection<Notification>,
}

/// The notification collection as the poller last left it.
///
/// GET /api/notifications
#[instrument(skip_all, fields(user_id = %user.id))]
async fn notifications(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Response, AppError> {
    let workspace = state
        .workspace(&user)
        .await
        .ok_or_else(|| AppError::Forbidden("no known role".to_owned()))?;
    let notifications = workspace.state().read().await.notifications.clone();
    let unread = notifications.items().iter().filter(|n| !n.read).count();
    Ok(Json(NotificationsResponse {
        unread,
        notifications,
    })
    .into_response())
}

/// Re-run the bootstrap for the signed-in user.
///
/// POST /api/refresh
#[instrument(skip_all, fields(user_id = %user.id))]
async fn refresh(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<BootstrapReport>, AppError> {
    let workspace = state
        .workspace(&user)
        .await
        .ok_or_else(|| AppError::Forbidden("no known role".to_owned()))?;
    Ok(Json(workspace.refresh(state.api()).await))
}
