//! The static route manifest.

use serde::Serialize;

use crate::types::Role;

/// Path of the role-dispatched landing page.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// A page rendered from the manifest.
///
/// The dashboard is not a `Page`: its entry carries `page: None` and the
/// concrete view is chosen per role at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Activations,
    UnassignedActivations,
    TodaysActivations,
    OverdueActivations,
    Buildings,
    Splitters,
    Materials,
    LowStockMaterials,
    ServiceInstallers,
    InstallerPerformance,
    Invoices,
    Reports,
    Projects,
    Tasks,
    Users,
    Profile,
    Notifications,
}

/// One manifest entry.
///
/// `roles: None` means the entry declares no role restriction. Route
/// rendering then admits every recognized role, while the sidebar leaves
/// the entry out entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: String,
    pub title: String,
    pub icon: Option<String>,
    pub roles: Option<Vec<Role>>,
    pub children: Vec<RouteEntry>,
    pub sidebar: bool,
    pub auth: bool,
    pub page: Option<Page>,
}

impl RouteEntry {
    /// An authenticated, sidebar-listed entry with no role restriction.
    #[must_use]
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            icon: None,
            roles: None,
            children: Vec::new(),
            sidebar: true,
            auth: true,
            page: None,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn roles(mut self, roles: &[Role]) -> Self {
        self.roles = Some(roles.to_vec());
        self
    }

    #[must_use]
    pub const fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Keep the entry out of the sidebar.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.sidebar = false;
        self
    }

    /// Serve the entry without authentication.
    #[must_use]
    pub const fn public(mut self) -> Self {
        self.auth = false;
        self
    }

    /// Whether the entry's own role list admits `role`. An entry without a
    /// role list admits everyone.
    #[must_use]
    pub fn admits(&self, role: Role) -> bool {
        self.roles.as_ref().is_none_or(|roles| roles.contains(&role))
    }

    /// Path of this entry relative to `parent`, without a leading slash.
    ///
    /// Returns the full path when it does not sit under the parent.
    #[must_use]
    pub fn relative_to(&self, parent: &Self) -> &str {
        self.path
            .strip_prefix(parent.path.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&self.path)
    }
}

/// Where a manifest path resolved.
#[derive(Debug, Clone, Copy)]
pub enum RouteMatch<'a> {
    /// A top-level entry.
    Parent(&'a RouteEntry),
    /// A child entry and the parent it hangs from.
    Child {
        parent: &'a RouteEntry,
        child: &'a RouteEntry,
    },
}

impl<'a> RouteMatch<'a> {
    /// The matched entry.
    #[must_use]
    pub const fn entry(&self) -> &'a RouteEntry {
        match *self {
            Self::Parent(entry) | Self::Child { child: entry, .. } => entry,
        }
    }

    /// Roles that gate this entry: a child's own list, else its parent's.
    #[must_use]
    pub fn effective_roles(&self) -> Option<&'a [Role]> {
        match *self {
            Self::Parent(entry) => entry.roles.as_deref(),
            Self::Child { parent, child } => {
                child.roles.as_deref().or(parent.roles.as_deref())
            }
        }
    }
}

/// The full, ordered set of manifest entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteManifest {
    entries: Vec<RouteEntry>,
}

impl RouteManifest {
    #[must_use]
    pub const fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Resolve an exact path to its entry.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.entries.iter().find_map(|parent| {
            if parent.path == path {
                return Some(RouteMatch::Parent(parent));
            }
            parent
                .children
                .iter()
                .find(|child| child.path == path)
                .map(|child| RouteMatch::Child { parent, child })
        })
    }

    /// Every path in the manifest, parents before their children.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(|parent| {
            std::iter::once(parent.path.as_str())
                .chain(parent.children.iter().map(|c| c.path.as_str()))
        })
    }

    /// The panel's manifest.
    #[must_use]
    pub fn standard() -> Self {
        use Role::{Accountant, Installer, SuperAdmin, Supervisor, Warehouse};

        Self::new(vec![
            RouteEntry::new(DASHBOARD_PATH, "Dashboard")
                .icon("home")
                .roles(Role::ALL),
            RouteEntry::new("/activations", "Activations")
                .icon("clipboard-list")
                .roles(&[SuperAdmin, Supervisor, Installer])
                .page(Page::Activations)
                .child(
                    RouteEntry::new("/activations/unassigned", "Unassigned Activations")
                        .roles(&[SuperAdmin, Supervisor])
                        .page(Page::UnassignedActivations),
                )
                .child(
                    RouteEntry::new("/activations/today", "Today's Activations")
                        .page(Page::TodaysActivations),
                )
                .child(
                    RouteEntry::new("/activations/overdue", "Overdue Activations")
                        .page(Page::OverdueActivations),
                ),
            RouteEntry::new("/buildings", "Buildings")
                .icon("building")
                .roles(&[SuperAdmin, Supervisor])
                .page(Page::Buildings)
                .child(RouteEntry::new("/buildings/splitters", "Splitters").page(Page::Splitters)),
            RouteEntry::new("/materials", "Materials")
                .icon("package")
                .roles(&[SuperAdmin, Warehouse, Supervisor])
                .page(Page::Materials)
                .child(
                    RouteEntry::new("/materials/low-stock", "Low Stock")
                        .roles(&[SuperAdmin, Warehouse])
                        .page(Page::LowStockMaterials),
                ),
            RouteEntry::new("/service-installers", "Service Installers")
                .icon("users")
                .roles(&[SuperAdmin, Supervisor])
                .page(Page::ServiceInstallers)
                .child(
                    RouteEntry::new("/service-installers/performance", "Installer Performance")
                        .page(Page::InstallerPerformance),
                ),
            RouteEntry::new("/invoices", "Invoices")
                .icon("receipt")
                .roles(&[SuperAdmin, Accountant])
                .page(Page::Invoices),
            RouteEntry::new("/reports", "Reports")
                .icon("chart-bar")
                .roles(&[SuperAdmin, Supervisor, Accountant])
                .page(Page::Reports),
            RouteEntry::new("/projects", "Projects")
                .icon("folder")
                .roles(&[SuperAdmin, Supervisor])
                .page(Page::Projects)
                .child(RouteEntry::new("/projects/tasks", "Tasks").page(Page::Tasks)),
            RouteEntry::new("/users", "Users")
                .icon("user-cog")
                .roles(&[SuperAdmin])
                .page(Page::Users),
            RouteEntry::new("/profile", "Profile")
                .page(Page::Profile)
                .hidden(),
            RouteEntry::new("/notifications", "Notifications")
                .icon("bell")
                .page(Page::Notifications),
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_find_parent_and_child() {
        let manifest = RouteManifest::standard();
        assert!(matches!(
            manifest.find("/buildings"),
            Some(RouteMatch::Parent(_))
        ));
        let child = manifest.find("/buildings/splitters").unwrap();
        assert!(matches!(child, RouteMatch::Child { .. }));
        assert_eq!(child.entry().page, Some(Page::Splitters));
        assert!(manifest.find("/nowhere").is_none());
    }

    #[test]
    fn test_child_inherits_parent_roles() {
        let manifest = RouteManifest::standard();
        let today = manifest.find("/activations/today").unwrap();
        assert_eq!(
            today.effective_roles().unwrap(),
            &[Role::SuperAdmin, Role::Supervisor, Role::Installer]
        );
        let unassigned = manifest.find("/activations/unassigned").unwrap();
        assert_eq!(
            unassigned.effective_roles().unwrap(),
            &[Role::SuperAdmin, Role::Supervisor]
        );
    }

    #[test]
    fn test_relative_child_path() {
        let parent = RouteEntry::new("/activations", "Activations");
        let child = RouteEntry::new("/activations/today", "Today");
        assert_eq!(child.relative_to(&parent), "today");
        let stray = RouteEntry::new("/elsewhere", "Elsewhere");
        assert_eq!(stray.relative_to(&parent), "/elsewhere");
    }

    #[test]
    fn test_paths_are_unique() {
        let manifest = RouteManifest::standard();
        let mut paths: Vec<&str> = manifest.paths().collect();
        let total = paths.len();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), total);
    }
}
