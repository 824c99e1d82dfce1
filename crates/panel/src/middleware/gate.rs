//! Route gate middleware.
//!
//! Runs [`authorize`] for every page request and either short-circuits with
//! a redirect or 404, or hands the resolved [`RouteTarget`] to the handler
//! through request extensions.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cephas_core::access::{Access, Identity, RouteTarget, UNAUTHORIZED_PATH, authorize};

use super::auth::OptionalAuth;
use crate::routes::pages::not_found_page;
use crate::state::AppState;

/// Gate every request that reaches the page router.
pub async fn route_gate(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = user
        .as_ref()
        .map_or(Identity::Anonymous, |user| user.identity());
    let path = request.uri().path().to_owned();

    match authorize(state.manifest(), &path, identity) {
        Access::Render(target) => {
            tracing::debug!(path = %path, ?target, "Route authorized");
            request.extensions_mut().insert::<RouteTarget>(target);
            next.run(request).await
        }
        Access::Redirect(to) => Redirect::to(to).into_response(),
        Access::Unauthorized => {
            tracing::info!(
                path = %path,
                role = user.as_ref().and_then(|u| u.role.as_deref()).unwrap_or("none"),
                "Route denied"
            );
            Redirect::to(UNAUTHORIZED_PATH).into_response()
        }
        Access::NotFound => {
            (StatusCode::NOT_FOUND, not_found_page(user.is_some(), &path)).into_response()
        }
    }
}
