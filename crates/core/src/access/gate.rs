//! Per-request route authorization.

use serde::Serialize;

use super::AccessError;
use crate::navigation::{DASHBOARD_PATH, Page, RouteManifest, RouteMatch};
use crate::types::Role;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    /// A signed-in user. `role` is `None` when the stored role is missing
    /// or not one of the known roles.
    Authenticated { role: Option<Role> },
}

impl Identity {
    /// Build an identity from stored credentials. Only a non-empty token
    /// counts as signed in.
    #[must_use]
    pub fn from_credentials(token: Option<&str>, role: Option<&str>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => Self::Authenticated {
                role: role.and_then(|r| r.parse().ok()),
            },
            _ => Self::Anonymous,
        }
    }

    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { role } => *role,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Outcome of checking one identity against one route's role list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    AuthenticatedNoRole,
    AuthenticatedAuthorized,
    AuthenticatedUnauthorized,
}

/// Classify `identity` against a route's allowed roles.
///
/// A route without a role list admits every recognized role.
#[must_use]
pub fn classify(identity: Identity, allowed: Option<&[Role]>) -> GateState {
    match identity {
        Identity::Anonymous => GateState::Unauthenticated,
        Identity::Authenticated { role: None } => GateState::AuthenticatedNoRole,
        Identity::Authenticated { role: Some(role) } => {
            if allowed.is_none_or(|roles| roles.contains(&role)) {
                GateState::AuthenticatedAuthorized
            } else {
                GateState::AuthenticatedUnauthorized
            }
        }
    }
}

/// Role-specific dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardKind {
    Admin,
    Supervisor,
    Installer,
    Accountant,
    Warehouse,
}

impl DashboardKind {
    /// Wire name, as serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Installer => "installer",
            Self::Accountant => "accountant",
            Self::Warehouse => "warehouse",
        }
    }
}

impl core::fmt::Display for DashboardKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard for a known role.
#[must_use]
pub const fn dashboard_for(role: Role) -> DashboardKind {
    match role {
        Role::SuperAdmin => DashboardKind::Admin,
        Role::Supervisor => DashboardKind::Supervisor,
        Role::Installer => DashboardKind::Installer,
        Role::Accountant => DashboardKind::Accountant,
        Role::Warehouse => DashboardKind::Warehouse,
    }
}

/// Dashboard for a stored role string.
///
/// # Errors
///
/// Returns [`AccessError::UnknownRole`] when the role is missing or not one
/// of the known roles.
pub fn resolve_dashboard(role: Option<&str>) -> Result<DashboardKind, AccessError> {
    let raw = role.unwrap_or_default();
    raw.parse::<Role>()
        .map(dashboard_for)
        .map_err(|_| AccessError::UnknownRole(raw.to_owned()))
}

/// Pages reachable without signing in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum PublicPage {
    Login,
    ForgotPassword,
    ResetPassword { token: Option<String> },
}

impl PublicPage {
    /// Match a request path against the public routes.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            LOGIN_PATH => Some(Self::Login),
            "/forgot-password" => Some(Self::ForgotPassword),
            "/reset-password" => Some(Self::ResetPassword { token: None }),
            _ => path
                .strip_prefix("/reset-password/")
                .filter(|token| !token.is_empty() && !token.contains('/'))
                .map(|token| Self::ResetPassword {
                    token: Some(token.to_owned()),
                }),
        }
    }
}

/// What to render for an authorized request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "kebab-case")]
pub enum RouteTarget {
    Public(PublicPage),
    Dashboard(DashboardKind),
    Page(Page),
    Unauthorized,
}

/// Gate decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Render(RouteTarget),
    Redirect(&'static str),
    /// Send the user to [`UNAUTHORIZED_PATH`].
    Unauthorized,
    NotFound,
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Decide what `identity` gets for `path`.
///
/// Public routes render for anonymous users and bounce signed-in users to
/// the dashboard. Everything else sends anonymous users to the login page.
/// Signed-in users without a recognized role are unauthorized everywhere
/// except the unauthorized page itself. A top-level entry whose roles
/// exclude the user is unauthorized; a child entry whose roles (or its
/// parent's) exclude the user is not found, matching the route set
/// [`compose_routes`](crate::navigation::compose_routes) builds.
#[must_use]
pub fn authorize(manifest: &RouteManifest, path: &str, identity: Identity) -> Access {
    let path = normalize(path);

    if let Some(page) = PublicPage::from_path(path) {
        return if identity.is_authenticated() {
            Access::Redirect(DASHBOARD_PATH)
        } else {
            Access::Render(RouteTarget::Public(page))
        };
    }

    let Identity::Authenticated { role } = identity else {
        return Access::Redirect(LOGIN_PATH);
    };

    if path == UNAUTHORIZED_PATH {
        return Access::Render(RouteTarget::Unauthorized);
    }
    if path == "/" {
        return Access::Redirect(DASHBOARD_PATH);
    }

    let Some(found) = manifest.find(path) else {
        return Access::NotFound;
    };
    let entry = found.entry();

    if !entry.auth {
        return entry
            .page
            .map_or(Access::NotFound, |page| Access::Render(RouteTarget::Page(page)));
    }

    match classify(identity, found.effective_roles()) {
        GateState::Unauthenticated => Access::Redirect(LOGIN_PATH),
        GateState::AuthenticatedNoRole => Access::Unauthorized,
        GateState::AuthenticatedUnauthorized => match found {
            RouteMatch::Parent(_) => Access::Unauthorized,
            RouteMatch::Child { .. } => Access::NotFound,
        },
        GateState::AuthenticatedAuthorized => match (entry.page, role) {
            (Some(page), _) => Access::Render(RouteTarget::Page(page)),
            (None, Some(role)) => Access::Render(RouteTarget::Dashboard(dashboard_for(role))),
            (None, None) => Access::Unauthorized,
        },
    }
}
