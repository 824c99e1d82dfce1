//! Core types for Cephas Tracker.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod status;
pub mod timestamp;
pub mod tracker_number;

pub use id::*;
pub use status::*;
pub use timestamp::Timestamp;
pub use tracker_number::{TrackerNumber, TrackerNumberError};
