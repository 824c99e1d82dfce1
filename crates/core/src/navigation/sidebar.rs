//! Sidebar menu construction.

use serde::Serialize;

use super::manifest::{RouteEntry, RouteManifest};
use crate::types::Role;

/// One sidebar link and its nested links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    pub path: String,
    pub title: String,
    pub icon: Option<String>,
    pub children: Vec<SidebarItem>,
}

impl SidebarItem {
    fn from_entry(entry: &RouteEntry, children: Vec<Self>) -> Self {
        Self {
            path: entry.path.clone(),
            title: entry.title.clone(),
            icon: entry.icon.clone(),
            children,
        }
    }

    /// This link followed by its children, depth first.
    pub fn links(&self) -> impl Iterator<Item = &Self> {
        std::iter::once(self).chain(self.children.iter().flat_map(|c| {
            // Sidebar trees are two levels deep.
            std::iter::once(c).chain(c.children.iter())
        }))
    }
}

/// Build the sidebar for `role`.
///
/// Stricter than route composition: a top-level entry must declare a role
/// list containing `role`; entries without one never appear. Children are
/// filtered by their own roles, falling back to the parent's.
#[must_use]
pub fn build_sidebar(manifest: &RouteManifest, role: Role) -> Vec<SidebarItem> {
    manifest
        .entries()
        .iter()
        .filter(|entry| entry.sidebar)
        .filter(|entry| entry.roles.as_ref().is_some_and(|r| r.contains(&role)))
        .map(|entry| {
            let children = entry
                .children
                .iter()
                .filter(|child| child.sidebar)
                .filter(|child| {
                    child
                        .roles
                        .as_ref()
                        .or(entry.roles.as_ref())
                        .is_some_and(|r| r.contains(&role))
                })
                .map(|child| SidebarItem::from_entry(child, Vec::new()))
                .collect();
            SidebarItem::from_entry(entry, children)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::manifest::Page;

    fn titles(items: &[SidebarItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_entry_without_roles_is_absent_for_every_role() {
        let manifest = RouteManifest::new(vec![
            RouteEntry::new("/dashboard", "Dashboard").roles(Role::ALL),
            RouteEntry::new("/help", "Help").page(Page::Profile),
        ]);
        for role in Role::ALL {
            let sidebar = build_sidebar(&manifest, *role);
            assert_eq!(titles(&sidebar), vec!["Dashboard"], "role {role}");
        }
    }

    #[test]
    fn test_standard_sidebar_per_role() {
        let manifest = RouteManifest::standard();

        let installer = build_sidebar(&manifest, Role::Installer);
        assert_eq!(titles(&installer), vec!["Dashboard", "Activations"]);
        let activations = &installer[1];
        assert_eq!(
            titles(&activations.children),
            vec!["Today's Activations", "Overdue Activations"]
        );

        let warehouse = build_sidebar(&manifest, Role::Warehouse);
        assert_eq!(titles(&warehouse), vec!["Dashboard", "Materials"]);
        assert_eq!(titles(&warehouse[1].children), vec!["Low Stock"]);

        let supervisor = build_sidebar(&manifest, Role::Supervisor);
        assert!(titles(&supervisor).contains(&"Materials"));
        let materials = supervisor.iter().find(|i| i.title == "Materials");
        assert!(materials.is_some_and(|m| m.children.is_empty()));
    }

    #[test]
    fn test_hidden_and_unrestricted_entries_never_listed() {
        let manifest = RouteManifest::standard();
        let admin = build_sidebar(&manifest, Role::SuperAdmin);
        let all = titles(&admin);
        assert!(!all.contains(&"Profile"));
        assert!(!all.contains(&"Notifications"));
        assert!(all.contains(&"Users"));
    }

    #[test]
    fn test_links_flatten_children() {
        let manifest = RouteManifest::standard();
        let sidebar = build_sidebar(&manifest, Role::Supervisor);
        let links: Vec<&str> = sidebar
            .iter()
            .flat_map(|item| item.links())
            .map(|l| l.path.as_str())
            .collect();
        assert!(links.contains(&"/activations/unassigned"));
        assert!(links.contains(&"/projects/tasks"));
    }
}
