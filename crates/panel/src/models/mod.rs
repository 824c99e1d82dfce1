//! Types stored in the panel's session.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
