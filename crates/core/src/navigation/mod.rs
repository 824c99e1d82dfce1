//! Route manifest, protected route composition, sidebar and page titles.

mod compose;
mod manifest;
mod sidebar;
mod title;

pub use compose::{ComposedRoute, compose_routes};
pub use manifest::{DASHBOARD_PATH, Page, RouteEntry, RouteManifest, RouteMatch};
pub use sidebar::{SidebarItem, build_sidebar};
pub use title::{DEFAULT_TITLE, resolve_title};
