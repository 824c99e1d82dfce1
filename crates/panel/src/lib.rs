//! Cephas Panel library.
//!
//! The role-gated web panel for Cephas Tracker, as a library so the server
//! binary, the CLI and the integration tests share one router.
//!
//! # Request flow
//!
//! 1. The session layer loads the signed-in [`CurrentUser`](models::CurrentUser).
//! 2. The route gate decides render, redirect, unauthorized or not found.
//! 3. Handlers read the user's [`Workspace`](services::Workspace), the
//!    collections bootstrapped from the tracker API at sign-in and kept
//!    fresh by the notification poller.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use axum::middleware::from_fn;
use tower_sessions::cookie::Key;

use crate::middleware::{SessionBackend, request_id};
use crate::state::AppState;

/// Build the full application router: pages, API, health checks, sessions
/// and request IDs.
///
/// Tracing and Sentry layers are left to the caller.
pub fn app(state: AppState, sessions: SessionBackend, key: Key) -> Router {
    let router = routes::routes(&state);
    sessions
        .apply(router, state.config(), key)
        .layer(from_fn(request_id::middleware))
        .with_state(state)
}
