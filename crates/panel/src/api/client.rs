//! HTTP client for the tracker REST API.

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{ApiError, ApiResource, Envelope, ListPayload, LoginData, TrackerSource};
use crate::config::ApiConfig;

/// Retry-After fallback when a 429 carries no usable header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Tracker REST API client.
///
/// Cheap to clone; clones share one connection pool. The client holds no
/// credentials of its own: every authenticated call takes the signed-in
/// user's bearer token.
#[derive(Clone)]
pub struct TrackerApiClient {
    inner: Arc<TrackerApiClientInner>,
}

struct TrackerApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl TrackerApiClient {
    /// Create a client for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cephas-panel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(TrackerApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request and unwrap the envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_owned());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        if !envelope.success {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "request failed".to_owned()),
            ));
        }

        Ok(envelope)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange email and password for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` or `ApiError::Rejected` for bad
    /// credentials, and transport or parse errors otherwise.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginData, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let request = self.inner.client.post(self.endpoint("auth/login")?).json(&body);

        self.send::<LoginData>(request)
            .await?
            .data
            .ok_or(ApiError::MissingData)
    }

    /// Ask the API to email a password reset link.
    ///
    /// Returns the API's message, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request or is unreachable.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, ApiError> {
        let body = serde_json::json!({ "email": email });
        let request = self
            .inner
            .client
            .post(self.endpoint("auth/forgot-password")?)
            .json(&body);

        Ok(self.send::<serde_json::Value>(request).await?.message)
    }

    /// Set a new password using a reset token from the reset email.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or expired, or the API is
    /// unreachable.
    #[instrument(skip(self, token, password))]
    pub async fn reset_password(
        &self,
        token: &str,
        password: &SecretString,
    ) -> Result<Option<String>, ApiError> {
        let body = serde_json::json!({
            "token": token,
            "password": password.expose_secret(),
        });
        let request = self
            .inner
            .client
            .post(self.endpoint("auth/reset-password")?)
            .json(&body);

        Ok(self.send::<serde_json::Value>(request).await?.message)
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Fetch every record of one collection.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the token has expired, and
    /// transport, status or parse errors otherwise.
    #[instrument(skip(self, token), fields(endpoint = T::ENDPOINT))]
    pub async fn list<T: ApiResource>(&self, token: &SecretString) -> Result<Vec<T>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.endpoint(T::ENDPOINT)?)
            .bearer_auth(token.expose_secret());

        let items = self
            .send::<ListPayload<T>>(request)
            .await?
            .data
            .map(ListPayload::into_items)
            .unwrap_or_default();

        tracing::debug!(count = items.len(), "Fetched collection");
        Ok(items)
    }

    /// Check that the API answers at all.
    ///
    /// Any HTTP response counts as reachable; only transport failures fail.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the API cannot be reached.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.inner
            .client
            .get(self.inner.base_url.clone())
            .send()
            .await?;
        Ok(())
    }
}

impl TrackerSource for TrackerApiClient {
    fn fetch_all<T: ApiResource>(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<Vec<T>, ApiError>> + Send {
        self.list::<T>(token)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
    };
    use cephas_core::{Building, Material, Notification};

    use super::*;

    async fn spawn(router: Router) -> TrackerApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let config = ApiConfig::new(&format!("http://{addr}/api"), Duration::from_secs(5)).unwrap();
        TrackerApiClient::new(&config).unwrap()
    }

    fn token() -> SecretString {
        SecretString::from("t0ken".to_owned())
    }

    #[tokio::test]
    async fn test_list_sends_bearer_and_unwraps() {
        let router = Router::new().route(
            "/api/buildings",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_owned();
                if auth == "Bearer t0ken" {
                    Json(serde_json::json!({
                        "success": true,
                        "data": { "items": [{ "_id": "b1", "name": "Tower A" }] }
                    }))
                    .into_response()
                } else {
                    StatusCode::UNAUTHORIZED.into_response()
                }
            }),
        );
        let client = spawn(router).await;

        let buildings: Vec<Building> = client.list(&token()).await.unwrap();
        assert_eq!(buildings.len(), 1);
        assert_eq!(buildings[0].name.as_deref(), Some("Tower A"));
    }

    #[tokio::test]
    async fn test_list_maps_unauthorized() {
        let router = Router::new().route(
            "/api/materials",
            get(|| async { StatusCode::UNAUTHORIZED }),
        );
        let client = spawn(router).await;

        let err = client.list::<Material>(&token()).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_rejected() {
        let router = Router::new().route(
            "/api/notifications",
            get(|| async { Json(serde_json::json!({ "success": false, "message": "nope" })) }),
        );
        let client = spawn(router).await;

        let err = client.list::<Notification>(&token()).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref m) if m == "nope"));
    }

    #[tokio::test]
    async fn test_status_error_carries_message() {
        let router = Router::new().route(
            "/api/auth/login",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "success": false, "message": "Invalid credentials" })),
                )
            }),
        );
        let client = spawn(router).await;

        let err = client
            .login("a@b.c", &SecretString::from("pw".to_owned()))
            .await
            .unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(err.to_string(), "API returned 400: Invalid credentials");
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let router = Router::new().route(
            "/api/buildings",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "7")]) }),
        );
        let client = spawn(router).await;

        let err = client.list::<Building>(&token()).await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited(7)));
    }
}
