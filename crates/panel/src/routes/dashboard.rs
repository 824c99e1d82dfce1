//! Dashboard route handler.

use askama::Template;
use axum::{Extension, extract::State, response::Html};
use cephas_core::access::{DashboardKind, RouteTarget};
use cephas_core::navigation::DASHBOARD_PATH;
use chrono::Local;
use tracing::instrument;

use crate::components::Layout;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::services::{DashboardView, build_dashboard};
use crate::state::AppState;

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub view: DashboardView,
}

/// Build `kind`'s dashboard from the user's workspace, with the page chrome.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] if the user has no known role.
pub async fn load(
    state: &AppState,
    user: &CurrentUser,
    kind: DashboardKind,
) -> Result<(DashboardView, Layout), AppError> {
    let workspace = state
        .workspace(user)
        .await
        .ok_or_else(|| AppError::Forbidden("no dashboard for this role".to_owned()))?;
    let tracker = workspace.state().read().await;
    let view = build_dashboard(kind, &tracker, &user.id, &Local::now());
    let layout = Layout::new(state.manifest(), user, DASHBOARD_PATH).with_state(&tracker);
    Ok((view, layout))
}

/// Render the signed-in user's dashboard.
///
/// GET /dashboard
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Extension(target): Extension<RouteTarget>,
) -> Result<Html<String>, AppError> {
    let RouteTarget::Dashboard(kind) = target else {
        return Err(AppError::NotFound(DASHBOARD_PATH.to_owned()));
    };
    let (view, layout) = load(&state, &user, kind).await?;
    Ok(Html(DashboardTemplate { layout, view }.render()?))
}
