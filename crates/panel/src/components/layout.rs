//! Page chrome shared by every signed-in page: sidebar, title and the
//! user badge.

use cephas_core::navigation::{RouteManifest, SidebarItem, build_sidebar, resolve_title};
use cephas_core::{CollectionKind, TrackerState};

use super::data_table::humanize;
use crate::models::CurrentUser;

/// One rendered sidebar link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub path: String,
    pub title: String,
    pub icon: String,
    /// The current page is this link or one of its children.
    pub active: bool,
    pub children: Vec<NavLink>,
}

impl NavLink {
    fn from_item(item: &SidebarItem, current_path: &str) -> Self {
        let children: Vec<Self> = item
            .children
            .iter()
            .map(|child| Self::from_item(child, current_path))
            .collect();
        let active = item.path == current_path || children.iter().any(|c| c.active);
        Self {
            path: item.path.clone(),
            title: item.title.clone(),
            icon: item.icon.clone().unwrap_or_else(|| "circle".to_owned()),
            active,
            children,
        }
    }
}

/// Layout data for `base.html`.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Page title from the sidebar.
    pub title: String,
    pub sidebar: Vec<NavLink>,
    pub user_name: String,
    pub user_email: String,
    pub role_label: String,
    pub current_path: String,
    /// Unread notifications.
    pub unread: usize,
    /// Labels of collections whose last fetch failed.
    pub failed: Vec<String>,
}

impl Layout {
    /// Chrome for `user` on `path`. Users without a recognized role get an
    /// empty sidebar.
    #[must_use]
    pub fn new(manifest: &RouteManifest, user: &CurrentUser, path: &str) -> Self {
        let items = user
            .role()
            .map(|role| build_sidebar(manifest, role))
            .unwrap_or_default();
        let title = resolve_title(&items, path).to_owned();
        Self {
            title,
            sidebar: items
                .iter()
                .map(|item| NavLink::from_item(item, path))
                .collect(),
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            role_label: user
                .role
                .as_deref()
                .map_or_else(|| "No role".to_owned(), humanize),
            current_path: path.to_owned(),
            unread: 0,
            failed: Vec::new(),
        }
    }

    /// Fill in the notification badge and fetch warnings.
    #[must_use]
    pub fn with_state(mut self, state: &TrackerState) -> Self {
        self.unread = state.notifications.items().iter().filter(|n| !n.read).count();
        self.failed = state
            .failed_collections()
            .into_iter()
            .map(|kind: CollectionKind| kind.label().to_owned())
            .collect();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cephas_core::{Notification, UserId};

    use super::*;
    use crate::api::{LoginData, LoginUser};

    fn user(role: &str) -> CurrentUser {
        CurrentUser::from_login(LoginData {
            token: "token".to_owned(),
            user: LoginUser {
                id: UserId::new("u1"),
                name: Some("Ana Lima".to_owned()),
                email: Some("ana@cephas.test".to_owned()),
                role: Some(role.to_owned()),
            },
        })
    }

    #[test]
    fn test_layout_marks_active_parent() {
        let layout = Layout::new(
            &RouteManifest::standard(),
            &user("supervisor"),
            "/activations/overdue",
        );
        assert_eq!(layout.title, "Overdue Activations");
        let activations = layout
            .sidebar
            .iter()
            .find(|l| l.path == "/activations")
            .unwrap();
        assert!(activations.active);
        assert!(!layout.sidebar.iter().any(|l| l.path == "/users"));
        assert_eq!(layout.role_label, "Supervisor");
    }

    #[test]
    fn test_unknown_role_gets_no_sidebar() {
        let layout = Layout::new(&RouteManifest::standard(), &user("manager"), "/unauthorized");
        assert!(layout.sidebar.is_empty());
        assert_eq!(layout.role_label, "Manager");
    }

    #[test]
    fn test_with_state_counts_unread_and_failures() {
        let mut state = TrackerState::default();
        state.notifications.replace(vec![
            Notification {
                read: true,
                ..Notification::default()
            },
            Notification::default(),
        ]);
        state.materials.fail("API returned 503");
        let manifest = RouteManifest::standard();
        let layout = Layout::new(&manifest, &user("warehouse"), "/materials").with_state(&state);
        assert_eq!(layout.unread, 1);
        assert_eq!(layout.failed, vec!["materials".to_owned()]);
    }
}
