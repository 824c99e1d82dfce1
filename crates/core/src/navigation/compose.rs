//! Protected route composition.

use serde::Serialize;

use super::manifest::{DASHBOARD_PATH, Page, RouteManifest};
use crate::types::Role;

/// A route the panel renders for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedRoute<'a> {
    /// Absolute request path.
    pub path: &'a str,
    /// Path the route is mounted at: the exact path for a parent, the
    /// parent-relative path for a child.
    pub mount: &'a str,
    pub title: &'a str,
    pub page: Option<Page>,
    /// Roles the gate checks before rendering. Children carry their own
    /// list or the one inherited from their parent.
    pub roles: Option<&'a [Role]>,
}

/// Build the protected route set for `role`.
///
/// Every authenticated entry except the dashboard renders at its own path.
/// Parents are kept regardless of their roles so the gate can answer with
/// an unauthorized page. A child is kept only when its own roles, or its
/// parent's if it declares none, admit `role`; otherwise its path falls
/// through to not found.
#[must_use]
pub fn compose_routes(manifest: &RouteManifest, role: Role) -> Vec<ComposedRoute<'_>> {
    let mut routes = Vec::new();
    for parent in manifest
        .entries()
        .iter()
        .filter(|e| e.auth && e.path != DASHBOARD_PATH)
    {
        routes.push(ComposedRoute {
            path: &parent.path,
            mount: &parent.path,
            title: &parent.title,
            page: parent.page,
            roles: parent.roles.as_deref(),
        });
        for child in &parent.children {
            let roles = child.roles.as_deref().or(parent.roles.as_deref());
            if roles.is_some_and(|r| !r.contains(&role)) {
                continue;
            }
            routes.push(ComposedRoute {
                path: &child.path,
                mount: child.relative_to(parent),
                title: &child.title,
                page: child.page,
                roles,
            });
        }
    }
    routes
}
