//! Cephas Core - Domain library for the Cephas Tracker panel.
//!
//! This crate holds everything the panel computes without touching the
//! network:
//! - typed records for the upstream API's entities and their lenient
//!   deserialization
//! - the per-user [`TrackerState`] of entity collections
//! - the selector layer deriving filtered, counted, joined and searched views
//! - the role gate deciding what each identity may see
//! - the route manifest, sidebar and page title composer
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks. Selectors that depend on "now" take it as an argument.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, role and status enums, tracker numbers
//! - [`model`] - Entity records
//! - [`collection`] - `Collection<T>` and `TrackerState`
//! - [`filter`] - The `Filter<T>` criteria union
//! - [`selectors`] - Derived views
//! - [`access`] - Role gate and read permissions
//! - [`navigation`] - Route manifest, sidebar and titles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod collection;
pub mod de;
pub mod filter;
pub mod model;
pub mod navigation;
pub mod selectors;
pub mod types;

pub use collection::{Collection, CollectionKind, TrackerState};
pub use filter::Filter;
pub use model::*;
pub use types::*;
