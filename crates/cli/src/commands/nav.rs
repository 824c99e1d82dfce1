//! Route inspection against the standard manifest.

use std::fmt::Write as _;

use cephas_core::Role;
use cephas_core::access::{Access, Identity, RouteTarget, authorize};
use cephas_core::navigation::{
    ComposedRoute, RouteManifest, SidebarItem, build_sidebar, compose_routes,
};
use thiserror::Error;

/// Errors from the navigation commands.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("Invalid role: {0}. Valid roles: super-admin, supervisor, installer, accountant, warehouse")]
    InvalidRole(String),
}

fn render_sidebar(items: &[SidebarItem]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{:<28} {}", item.title, item.path);
        for child in &item.children {
            let _ = writeln!(out, "  {:<26} {}", child.title, child.path);
        }
    }
    out
}

fn render_routes(routes: &[ComposedRoute<'_>]) -> String {
    let mut out = String::new();
    for route in routes {
        let roles = route.roles.map_or_else(
            || "any role".to_owned(),
            |roles| {
                roles
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        );
        let _ = writeln!(out, "{:<34} {roles}", route.path);
    }
    out
}

fn describe(access: &Access) -> String {
    match access {
        Access::Render(RouteTarget::Public(page)) => format!("render public page {page:?}"),
        Access::Render(RouteTarget::Dashboard(kind)) => format!("render {kind} dashboard"),
        Access::Render(RouteTarget::Page(page)) => format!("render page {page:?}"),
        Access::Render(RouteTarget::Unauthorized) => "render unauthorized page".to_owned(),
        Access::Redirect(to) => format!("redirect to {to}"),
        Access::Unauthorized => "redirect to /unauthorized".to_owned(),
        Access::NotFound => "not found".to_owned(),
    }
}

/// Print the sidebar and protected routes `role` gets.
///
/// # Errors
///
/// Returns an error if `role` is not a known role.
pub fn sidebar(role: &str) -> Result<(), NavError> {
    let parsed: Role = role
        .parse()
        .map_err(|_| NavError::InvalidRole(role.to_owned()))?;
    let manifest = RouteManifest::standard();

    #[allow(clippy::print_stdout)]
    {
        println!("Sidebar for {parsed}:");
        print!("{}", render_sidebar(&build_sidebar(&manifest, parsed)));
        println!();
        println!("Routes:");
        print!("{}", render_routes(&compose_routes(&manifest, parsed)));
    }
    Ok(())
}

/// Print the gate decision for `path`. Any role string is accepted; an
/// unknown one is treated the way the panel treats it.
pub fn gate(role: Option<&str>, path: &str) {
    let identity = role.map_or(Identity::Anonymous, |role| {
        Identity::from_credentials(Some("cli"), Some(role))
    });
    let access = authorize(&RouteManifest::standard(), path, identity);

    #[allow(clippy::print_stdout)]
    {
        println!("{path}: {}", describe(&access));
    }
}

#[cfg(test)]
mod tests {
    use cephas_core::navigation::{DASHBOARD_PATH, Page};

    use super::*;

    #[test]
    fn test_render_sidebar_indents_children() {
        let manifest = RouteManifest::standard();
        let out = render_sidebar(&build_sidebar(&manifest, Role::Warehouse));
        assert!(out.lines().any(|l| l.starts_with("Materials")));
        assert!(out.lines().any(|l| l.starts_with("  Low Stock")));
        assert!(!out.contains("/users"));
    }

    #[test]
    fn test_render_routes_lists_roles() {
        let manifest = RouteManifest::standard();
        let out = render_routes(&compose_routes(&manifest, Role::SuperAdmin));
        let users = out.lines().find(|l| l.starts_with("/users")).unwrap_or_default();
        assert!(users.ends_with("super-admin"));
    }

    #[test]
    fn test_describe_decisions() {
        assert_eq!(describe(&Access::Redirect(DASHBOARD_PATH)), "redirect to /dashboard");
        assert_eq!(
            describe(&Access::Render(RouteTarget::Page(Page::Reports))),
            "render page Reports"
        );
        assert_eq!(describe(&Access::Unauthorized), "redirect to /unauthorized");
    }
}
