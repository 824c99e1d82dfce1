//! Normalized in-memory collections and the application state that groups
//! them.

use serde::Serialize;

use crate::model::{
    Building, Entity, Material, Notification, Order, Project, ServiceInstaller, Splitter, Task,
    User,
};

/// One entity collection plus its fetch metadata.
///
/// A collection that was never loaded is empty, not loading, and carries no
/// error, so every selector composes over it like any other empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T> Collection<T> {
    /// Create a loaded collection from a list of records.
    #[must_use]
    pub const fn from_items(items: Vec<T>) -> Self {
        Self {
            items,
            loading: false,
            error: None,
        }
    }

    /// The records, in upstream order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last fetch error, if the last fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mark a fetch as started. Existing records are kept.
    pub const fn start_loading(&mut self) {
        self.loading = true;
    }

    /// Replace the records with a successful fetch result.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    /// Record a failed refresh, keeping the last known good records.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.error = Some(error.into());
    }

    /// Record a failure and drop every record.
    pub fn reset_with_error(&mut self, error: impl Into<String>) {
        self.items.clear();
        self.fail(error);
    }
}

impl<T: Entity> Collection<T> {
    /// Insert a record, replacing any record with the same ID in place.
    pub fn upsert(&mut self, item: T) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.entity_id() == item.entity_id())
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }
}

/// Identifies one collection of [`TrackerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Orders,
    Buildings,
    Splitters,
    Materials,
    ServiceInstallers,
    Tasks,
    Projects,
    Users,
    Notifications,
}

impl CollectionKind {
    /// Every collection.
    pub const ALL: &'static [Self] = &[
        Self::Orders,
        Self::Buildings,
        Self::Splitters,
        Self::Materials,
        Self::ServiceInstallers,
        Self::Tasks,
        Self::Projects,
        Self::Users,
        Self::Notifications,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Orders => "activations",
            Self::Buildings => "buildings",
            Self::Splitters => "splitters",
            Self::Materials => "materials",
            Self::ServiceInstallers => "service installers",
            Self::Tasks => "tasks",
            Self::Projects => "projects",
            Self::Users => "users",
            Self::Notifications => "notifications",
        }
    }
}

/// All domain collections for one signed-in user.
///
/// This is the only mutable state the panel keeps. Selectors borrow it
/// immutably; fetch results are written through the collection methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackerState {
    pub orders: Collection<Order>,
    pub buildings: Collection<Building>,
    pub splitters: Collection<Splitter>,
    pub materials: Collection<Material>,
    pub service_installers: Collection<ServiceInstaller>,
    pub tasks: Collection<Task>,
    pub projects: Collection<Project>,
    pub users: Collection<User>,
    pub notifications: Collection<Notification>,
}

impl TrackerState {
    /// Error recorded on a collection, if any.
    #[must_use]
    pub fn error_of(&self, kind: CollectionKind) -> Option<&str> {
        match kind {
            CollectionKind::Orders => self.orders.error(),
            CollectionKind::Buildings => self.buildings.error(),
            CollectionKind::Splitters => self.splitters.error(),
            CollectionKind::Materials => self.materials.error(),
            CollectionKind::ServiceInstallers => self.service_installers.error(),
            CollectionKind::Tasks => self.tasks.error(),
            CollectionKind::Projects => self.projects.error(),
            CollectionKind::Users => self.users.error(),
            CollectionKind::Notifications => self.notifications.error(),
        }
    }

    /// Collections whose last fetch failed.
    #[must_use]
    pub fn failed_collections(&self) -> Vec<CollectionKind> {
        CollectionKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.error_of(*kind).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BuildingId;

    fn building(id: &str, name: &str) -> Building {
        Building {
            id: BuildingId::new(id),
            name: Some(name.to_owned()),
            ..Building::default()
        }
    }

    #[test]
    fn test_unloaded_collection_is_empty() {
        let c: Collection<Building> = Collection::default();
        assert!(c.is_empty());
        assert_eq!(c.total(), 0);
        assert!(!c.is_loading());
        assert!(c.error().is_none());
    }

    #[test]
    fn test_fail_keeps_last_known_good() {
        let mut c = Collection::from_items(vec![building("b1", "A")]);
        c.start_loading();
        c.fail("timeout");
        assert_eq!(c.total(), 1);
        assert_eq!(c.error(), Some("timeout"));
        assert!(!c.is_loading());
    }

    #[test]
    fn test_reset_with_error_clears() {
        let mut c = Collection::from_items(vec![building("b1", "A")]);
        c.reset_with_error("gave up");
        assert!(c.is_empty());
        assert_eq!(c.error(), Some("gave up"));
    }

    #[test]
    fn test_replace_clears_error() {
        let mut c: Collection<Building> = Collection::default();
        c.fail("boom");
        c.replace(vec![building("b1", "A")]);
        assert!(c.error().is_none());
        assert_eq!(c.total(), 1);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut c = Collection::from_items(vec![building("b1", "A"), building("b2", "B")]);
        c.upsert(building("b1", "A2"));
        c.upsert(building("b3", "C"));
        let names: Vec<_> = c.items().iter().map(Building::display_name).collect();
        assert_eq!(names, ["A2", "B", "C"]);
    }

    #[test]
    fn test_failed_collections() {
        let mut state = TrackerState::default();
        state.materials.fail("503");
        assert_eq!(state.failed_collections(), [CollectionKind::Materials]);
    }
}
