//! Read permissions per role.

use serde::Serialize;

use crate::collection::CollectionKind;
use crate::types::Role;

/// Something a role may or may not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Orders,
    Buildings,
    Splitters,
    Materials,
    ServiceInstallers,
    Tasks,
    Projects,
    Users,
    Invoices,
    Reports,
    Notifications,
}

impl Resource {
    pub const ALL: &'static [Self] = &[
        Self::Orders,
        Self::Buildings,
        Self::Splitters,
        Self::Materials,
        Self::ServiceInstallers,
        Self::Tasks,
        Self::Projects,
        Self::Users,
        Self::Invoices,
        Self::Reports,
        Self::Notifications,
    ];

    /// The resource backing a collection.
    #[must_use]
    pub const fn of_collection(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Orders => Self::Orders,
            CollectionKind::Buildings => Self::Buildings,
            CollectionKind::Splitters => Self::Splitters,
            CollectionKind::Materials => Self::Materials,
            CollectionKind::ServiceInstallers => Self::ServiceInstallers,
            CollectionKind::Tasks => Self::Tasks,
            CollectionKind::Projects => Self::Projects,
            CollectionKind::Users => Self::Users,
            CollectionKind::Notifications => Self::Notifications,
        }
    }
}

/// Whether `role` may read `resource`.
#[must_use]
pub const fn can_read(role: Role, resource: Resource) -> bool {
    use Resource::{
        Buildings, Invoices, Materials, Notifications, Orders, Projects, Reports,
        ServiceInstallers, Splitters, Tasks,
    };

    match role {
        Role::SuperAdmin => true,
        Role::Supervisor => matches!(
            resource,
            Orders
                | Buildings
                | Splitters
                | Materials
                | ServiceInstallers
                | Tasks
                | Projects
                | Reports
                | Notifications
        ),
        Role::Installer => matches!(resource, Orders | Buildings | Splitters | Notifications),
        Role::Accountant => matches!(resource, Orders | Invoices | Reports | Notifications),
        Role::Warehouse => matches!(resource, Materials | Orders | Notifications),
    }
}

/// Collections `role` loads at bootstrap.
#[must_use]
pub fn readable_collections(role: Role) -> Vec<CollectionKind> {
    CollectionKind::ALL
        .iter()
        .copied()
        .filter(|kind| can_read(role, Resource::of_collection(*kind)))
        .collect()
}
