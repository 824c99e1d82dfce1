//! Page title resolution.

use super::sidebar::SidebarItem;

/// Title shown when no sidebar link matches.
pub const DEFAULT_TITLE: &str = "Cephas Tracker";

fn is_segment_prefix(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Title for `path` given the sidebar the user sees.
///
/// Tries an exact link match, then the longest link that prefixes `path`
/// on a segment boundary (the root link never counts), then
/// [`DEFAULT_TITLE`].
#[must_use]
pub fn resolve_title<'a>(sidebar: &'a [SidebarItem], path: &str) -> &'a str {
    let links = || sidebar.iter().flat_map(|item| item.links());

    if let Some(exact) = links().find(|l| l.path == path) {
        return &exact.title;
    }

    links()
        .filter(|l| l.path != "/" && is_segment_prefix(&l.path, path))
        .max_by_key(|l| l.path.len())
        .map_or(DEFAULT_TITLE, |l| l.title.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::manifest::RouteManifest;
    use crate::navigation::sidebar::build_sidebar;
    use crate::types::Role;

    fn item(path: &str, title: &str) -> SidebarItem {
        SidebarItem {
            path: path.to_owned(),
            title: title.to_owned(),
            icon: None,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_exact_match_wins() {
        let sidebar = build_sidebar(&RouteManifest::standard(), Role::Supervisor);
        assert_eq!(resolve_title(&sidebar, "/activations"), "Activations");
        assert_eq!(
            resolve_title(&sidebar, "/activations/unassigned"),
            "Unassigned Activations"
        );
    }

    #[test]
    fn test_longest_prefix_match() {
        let sidebar = vec![
            item("/", "Home"),
            item("/buildings", "Buildings"),
            item("/buildings/splitters", "Splitters"),
        ];
        assert_eq!(resolve_title(&sidebar, "/buildings/splitters/42"), "Splitters");
        assert_eq!(resolve_title(&sidebar, "/buildings/7"), "Buildings");
    }

    #[test]
    fn test_prefix_respects_segment_boundary() {
        let sidebar = vec![item("/users", "Users")];
        assert_eq!(resolve_title(&sidebar, "/users-archive"), DEFAULT_TITLE);
    }

    #[test]
    fn test_root_link_never_prefix_matches() {
        let sidebar = vec![item("/", "Home")];
        assert_eq!(resolve_title(&sidebar, "/"), "Home");
        assert_eq!(resolve_title(&sidebar, "/anything"), DEFAULT_TITLE);
        assert_eq!(resolve_title(&[], "/anything"), DEFAULT_TITLE);
    }
}
