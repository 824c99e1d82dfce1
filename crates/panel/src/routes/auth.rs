//! Authentication route handlers.
//!
//! Sign-in, password recovery and sign-out all go through the tracker API;
//! the panel only keeps the resulting identity and token in the session.

use askama::Template;
use axum::{
    Extension, Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use cephas_core::access::{LOGIN_PATH, PublicPage, RouteTarget};
use cephas_core::navigation::DASHBOARD_PATH;
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiError;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Shortest password the reset form accepts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    email: String,
    error: Option<String>,
    notice: Option<String>,
}

/// Forgot password page template.
#[derive(Template)]
#[template(path = "auth/forgot_password.html")]
struct ForgotPasswordTemplate {
    email: String,
    error: Option<String>,
    notice: Option<String>,
}

/// Reset password page template.
#[derive(Template)]
#[template(path = "auth/reset_password.html")]
struct ResetPasswordTemplate {
    /// Token taken from the URL, if any.
    token: Option<String>,
    error: Option<String>,
}

fn render(template: &impl Template) -> Html<String> {
    Html(
        template
            .render()
            .unwrap_or_else(|_| String::from("Error rendering template")),
    )
}

/// Message shown for a rejected API call.
fn rejection_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Rejected(message) | ApiError::Status { message, .. } if !message.is_empty() => {
            message.clone()
        }
        _ => fallback.to_owned(),
    }
}

async fn take_flash(session: &Session) -> Option<String> {
    session
        .remove::<String>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// Render the login page.
///
/// GET /login
pub async fn login_page(session: Session) -> Html<String> {
    render(&LoginTemplate {
        email: String::new(),
        error: None,
        notice: take_flash(&session).await,
    })
}

/// Sign in against the tracker API.
///
/// POST /login
///
/// On success the session ID is cycled, the user stored, and the user's
/// workspace bootstrapped before redirecting to the dashboard. Users whose
/// role the panel does not know still sign in; the gate then sends them to
/// the unauthorized page.
#[instrument(skip_all, fields(email = %form.email.trim()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = form.email.trim().to_owned();
    if email.is_empty() || form.password.is_empty() {
        return Ok(render(&LoginTemplate {
            email,
            error: Some("Email and password are required".to_owned()),
            notice: None,
        })
        .into_response());
    }

    let password = SecretString::from(form.password);
    let login = match state.api().login(&email, &password).await {
        Ok(login) => login,
        Err(err) if err.is_auth_failure() => {
            tracing::info!(error = %err, "Login rejected");
            return Ok(render(&LoginTemplate {
                error: Some(rejection_message(&err, "Invalid email or password")),
                email,
                notice: None,
            })
            .into_response());
        }
        Err(err) => return Err(err.into()),
    };

    let user = CurrentUser::from_login(login);
    set_current_user(&session, &user).await?;
    set_sentry_user(user.id.as_str(), Some(&user.email));

    // A fresh token means a fresh workspace.
    state.workspaces().close(&user.id).await;
    if let Some(workspace) = state.workspace(&user).await {
        let report = workspace.last_bootstrap().await;
        tracing::info!(
            user_id = %user.id,
            role = %workspace.role(),
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "User signed in"
        );
    } else {
        tracing::info!(
            user_id = %user.id,
            role = user.role.as_deref().unwrap_or("none"),
            "User signed in without a known role"
        );
    }

    Ok(Redirect::to(DASHBOARD_PATH).into_response())
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    email: String,
}

/// Render the forgot password page.
///
/// GET /forgot-password
pub async fn forgot_password_page() -> Html<String> {
    render(&ForgotPasswordTemplate {
        email: String::new(),
        error: None,
        notice: None,
    })
}

/// Ask the tracker API to email a reset link.
///
/// POST /forgot-password
#[instrument(skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<Html<String>, AppError> {
    let email = form.email.trim().to_owned();
    if email.is_empty() {
        return Ok(render(&ForgotPasswordTemplate {
            email,
            error: Some("Email is required".to_owned()),
            notice: None,
        }));
    }

    match state.api().forgot_password(&email).await {
        Ok(message) => Ok(render(&ForgotPasswordTemplate {
            email: String::new(),
            error: None,
            notice: Some(message.unwrap_or_else(|| {
                "If that email is registered, a reset link is on its way.".to_owned()
            })),
        })),
        Err(err) if err.is_auth_failure() => Ok(render(&ForgotPasswordTemplate {
            error: Some(rejection_message(&err, "Could not send a reset link")),
            email,
            notice: None,
        })),
        Err(err) => Err(err.into()),
    }
}

/// Reset password form data.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    /// Token typed in by hand when the URL carried none.
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm_password: String,
}

fn url_token(target: &RouteTarget) -> Option<String> {
    match target {
        RouteTarget::Public(PublicPage::ResetPassword { token }) => token.clone(),
        _ => None,
    }
}

/// Render the reset password page.
///
/// GET /reset-password, GET /reset-password/{token}
pub async fn reset_password_page(Extension(target): Extension<RouteTarget>) -> Html<String> {
    render(&ResetPasswordTemplate {
        token: url_token(&target),
        error: None,
    })
}

/// Set a new password with a reset token.
///
/// POST /reset-password, POST /reset-password/{token}
///
/// A token in the URL wins over one in the form.
#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(target): Extension<RouteTarget>,
    session: Session,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response, AppError> {
    let from_url = url_token(&target);
    let token = from_url.clone().or_else(|| {
        form.token
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
    });
    let page_error = |message: &str| {
        render(&ResetPasswordTemplate {
            token: from_url.clone(),
            error: Some(message.to_owned()),
        })
        .into_response()
    };

    let Some(token) = token else {
        return Ok(page_error("The reset link is missing its token"));
    };
    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Ok(page_error(&format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if form.password != form.confirm_password {
        return Ok(page_error("Passwords do not match"));
    }

    let password = SecretString::from(form.password);
    match state.api().reset_password(&token, &password).await {
        Ok(message) => {
            let notice = message
                .unwrap_or_else(|| "Password updated. Sign in with your new password.".to_owned());
            session.insert(session_keys::FLASH, notice).await?;
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        Err(err) if err.is_auth_failure() => {
            tracing::info!(error = %err, "Password reset rejected");
            Ok(page_error(&rejection_message(
                &err,
                "The reset link is invalid or has expired",
            )))
        }
        Err(err) => Err(err.into()),
    }
}

/// Sign out: drop the workspace (stopping its poller) and clear the
/// session.
///
/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> impl IntoResponse {
    if let Some(user) = user {
        state.workspaces().close(&user.id).await;
        tracing::info!(user_id = %user.id, "User signed out");
    }
    let _ = clear_current_user(&session).await;
    clear_sentry_user();

    Redirect::to(LOGIN_PATH)
}
