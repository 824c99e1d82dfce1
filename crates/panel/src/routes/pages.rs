//! List pages, the unauthorized page and not found.

use askama::Template;
use axum::{
    Extension,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::Html,
};
use cephas_core::access::RouteTarget;
use chrono::Local;
use tracing::instrument;

use crate::components::{DataTable, Layout, PageContext, TableQuery};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::state::AppState;

/// List page template.
#[derive(Template)]
#[template(path = "list.html")]
pub struct ListTemplate {
    pub layout: Layout,
    pub heading: String,
    pub table: DataTable,
}

/// Unauthorized page template.
#[derive(Template)]
#[template(path = "unauthorized.html")]
pub struct UnauthorizedTemplate {
    pub layout: Layout,
    /// The user has no role the panel knows.
    pub no_role: bool,
}

/// Not found page template.
#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub path: String,
    pub signed_in: bool,
}

/// Render the list page the gate resolved for this path.
///
/// GET /activations, /buildings/splitters, ...
#[instrument(skip_all, fields(user_id = %user.id, path = %uri.path()))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Extension(target): Extension<RouteTarget>,
    uri: Uri,
    Query(query): Query<TableQuery>,
) -> Result<Html<String>, AppError> {
    let path = uri.path();
    let RouteTarget::Page(page) = target else {
        return Err(AppError::NotFound(path.to_owned()));
    };

    let workspace = state
        .workspace(&user)
        .await
        .ok_or_else(|| AppError::Forbidden("no pages for this role".to_owned()))?;
    let tracker = workspace.state().read().await;
    let now = Local::now();
    let table = PageContext {
        state: &tracker,
        viewer: &user,
        now: &now,
    }
    .table(page, &query);
    let layout = Layout::new(state.manifest(), &user, path).with_state(&tracker);
    drop(tracker);

    let heading = state
        .manifest()
        .find(path)
        .map_or_else(|| layout.title.clone(), |found| found.entry().title.clone());

    Ok(Html(
        ListTemplate {
            layout,
            heading,
            table,
        }
        .render()?,
    ))
}

/// Render the page users land on when the role gate denies them.
///
/// GET /unauthorized
pub async fn unauthorized(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    uri: Uri,
) -> Result<(StatusCode, Html<String>), AppError> {
    let template = UnauthorizedTemplate {
        no_role: user.role().is_none(),
        layout: Layout::new(state.manifest(), &user, uri.path()),
    };
    Ok((StatusCode::FORBIDDEN, Html(template.render()?)))
}

/// Render the not found page.
pub fn not_found_page(signed_in: bool, path: &str) -> Html<String> {
    Html(
        NotFoundTemplate {
            path: path.to_owned(),
            signed_in,
        }
        .render()
        .unwrap_or_else(|_| String::from("Error rendering template")),
    )
}

/// Requests the gate let through but no route serves.
pub async fn fallback(OptionalAuth(user): OptionalAuth, uri: Uri) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        not_found_page(user.is_some(), uri.path()),
    )
}
