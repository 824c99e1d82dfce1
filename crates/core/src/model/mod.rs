//! Typed records for the entities served by the upstream API.
//!
//! Every field the document store may omit is optional or defaulted, so a
//! partially populated record still deserializes and every selector sees a
//! neutral value (empty string, zero, `false`, `None`) for what is missing.

pub mod building;
pub mod installer;
pub mod material;
pub mod notification;
pub mod order;
pub mod splitter;
pub mod task;
pub mod user;

pub use building::Building;
pub use installer::{DEFAULT_MAX_ASSIGNMENTS, ServiceInstaller};
pub use material::Material;
pub use notification::Notification;
pub use order::Order;
pub use splitter::{PortUsage, Splitter};
pub use task::{Project, Task};
pub use user::User;

/// A record addressable by a string ID.
pub trait Entity {
    /// The record's ID in string form.
    fn entity_id(&self) -> &str;
}

macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Entity for $ty {
                fn entity_id(&self) -> &str {
                    self.id.as_str()
                }
            }
        )+
    };
}

impl_entity!(
    Building,
    Material,
    Notification,
    Order,
    Project,
    ServiceInstaller,
    Splitter,
    Task,
    User,
);
