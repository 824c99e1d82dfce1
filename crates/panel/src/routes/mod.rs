//! HTTP route handlers for the panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Upstream API reachable
//!
//! # Public (anonymous only)
//! GET  /login                      - Login page
//! POST /login                      - Sign in against the tracker API
//! GET  /forgot-password            - Request a reset link
//! POST /forgot-password
//! GET  /reset-password[/{token}]   - Choose a new password
//! POST /reset-password[/{token}]
//!
//! # Signed in
//! POST /logout                     - Sign out and drop the workspace
//! GET  /unauthorized               - Shown when the role gate denies a page
//! GET  /dashboard                  - Role dashboard
//! GET  <manifest path>             - One list page per manifest entry
//!
//! # JSON (401 when signed out)
//! GET  /api/navigation?path=       - Sidebar, title, routes, gate decision
//! GET  /api/dashboard              - Role dashboard data
//! GET  /api/notifications          - Notification collection
//! POST /api/refresh                - Re-run the bootstrap
//! ```
//!
//! Every page route, including the fallback, runs behind
//! [`route_gate`](crate::middleware::route_gate). Handlers read the gate's
//! decision from the [`RouteTarget`](cephas_core::access::RouteTarget)
//! request extension.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use cephas_core::access::{LOGIN_PATH, UNAUTHORIZED_PATH};
use cephas_core::navigation::DASHBOARD_PATH;

use crate::middleware::route_gate;
use crate::state::AppState;

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod pages;

/// Build the page and API router for `state`'s manifest.
pub fn routes(state: &AppState) -> Router<AppState> {
    let mut gated = Router::new()
        .route(LOGIN_PATH, get(auth::login_page).post(auth::login))
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route(
            "/reset-password",
            get(auth::reset_password_page).post(auth::reset_password),
        )
        .route(
            "/reset-password/{token}",
            get(auth::reset_password_page).post(auth::reset_password),
        )
        .route(UNAUTHORIZED_PATH, get(pages::unauthorized));

    for path in state.manifest().paths() {
        gated = if path == DASHBOARD_PATH {
            gated.route(path, get(dashboard::show))
        } else {
            gated.route(path, get(pages::show))
        };
    }

    gated
        .fallback(pages::fallback)
        .layer(from_fn_with_state(state.clone(), route_gate))
        .route("/logout", post(auth::logout))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(api::router())
}
