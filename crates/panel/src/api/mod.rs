//! Upstream tracker REST API client.
//!
//! Every collection the panel shows comes from the tracker's REST API. The
//! API wraps each payload in an envelope:
//!
//! ```json
//! { "success": true, "message": "optional text", "data": ... }
//! ```
//!
//! A `success: false` envelope or a non-2xx status becomes an [`ApiError`].
//! List endpoints return either a bare array or an object with an `items`
//! array in `data`; both shapes are accepted.

mod client;

pub use client::TrackerApiClient;

use std::future::Future;

use cephas_core::{
    Building, CollectionKind, Material, Notification, Order, Project, ServiceInstaller, Splitter,
    Task, User, UserId,
};
use secrecy::SecretString;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors that can occur when talking to the tracker API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint path could not be joined onto the base URL.
    #[error("Invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with a non-2xx status.
    #[error("API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the envelope, or the status reason.
        message: String,
    },

    /// The API answered 2xx but flagged the request as unsuccessful.
    #[error("API rejected request: {0}")]
    Rejected(String),

    /// The bearer token was missing, invalid or expired.
    #[error("API token rejected")]
    Unauthorized,

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A successful envelope carried no `data`.
    #[error("Response has no data")]
    MissingData,
}

impl ApiError {
    /// Whether the error came from bad credentials rather than an outage.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        match self {
            Self::Unauthorized | Self::Rejected(_) => true,
            Self::Status { status, .. } => matches!(*status, 400 | 401 | 403),
            _ => false,
        }
    }
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Missing means success; older endpoints omit the flag.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Human-readable status text.
    #[serde(default)]
    pub message: Option<String>,
    /// Payload.
    pub data: Option<T>,
}

const fn default_success() -> bool {
    true
}

/// The two list shapes the API produces.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    /// `data: [...]`
    Bare(Vec<T>),
    /// `data: { "items": [...] }`
    Wrapped {
        /// The records.
        #[serde(alias = "results", alias = "data")]
        items: Vec<T>,
    },
}

impl<T> ListPayload<T> {
    /// Unwrap the records.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { items } => items,
        }
    }
}

/// User record returned alongside the token on login.
///
/// The role stays a raw string: an unrecognized role must still sign in and
/// land on `/unauthorized` instead of failing the login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    /// User ID.
    #[serde(alias = "_id")]
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Role as sent by the API.
    #[serde(default)]
    pub role: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Bearer token for later calls.
    #[serde(alias = "accessToken")]
    pub token: String,
    /// The signed-in user.
    pub user: LoginUser,
}

/// A record type served by a list endpoint.
pub trait ApiResource: DeserializeOwned + Send + 'static {
    /// Endpoint path relative to the API base URL.
    const ENDPOINT: &'static str;
    /// The collection this record type fills.
    const KIND: CollectionKind;
}

macro_rules! api_resource {
    ($($ty:ty => $endpoint:literal, $kind:ident;)+) => {
        $(
            impl ApiResource for $ty {
                const ENDPOINT: &'static str = $endpoint;
                const KIND: CollectionKind = CollectionKind::$kind;
            }
        )+
    };
}

api_resource! {
    Order => "trackers", Orders;
    Building => "buildings", Buildings;
    Splitter => "splitters", Splitters;
    Material => "materials", Materials;
    ServiceInstaller => "service-installers", ServiceInstallers;
    Task => "tasks", Tasks;
    Project => "projects", Projects;
    User => "users", Users;
    Notification => "notifications", Notifications;
}

/// Anything that can serve collection fetches.
///
/// [`TrackerApiClient`] is the production implementation; tests substitute
/// in-memory sources.
pub trait TrackerSource: Send + Sync + 'static {
    /// Fetch every record of one collection with the user's token.
    fn fetch_all<T: ApiResource>(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<Vec<T>, ApiError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_defaults_success() {
        let env: Envelope<ListPayload<Building>> =
            serde_json::from_str(r#"{"data":[{"_id":"b1","name":"Tower A"}]}"#).unwrap();
        assert!(env.success);
        let items = env.data.unwrap().into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "b1");
    }

    #[derive(Debug, Deserialize)]
    struct Receipt {
        reference: String,
    }

    #[test]
    fn test_envelope_without_data() {
        let env: Envelope<Receipt> =
            serde_json::from_str(r#"{"success":true,"message":"Queued"}"#).unwrap();
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("Queued"));

        let env: Envelope<Receipt> =
            serde_json::from_str(r#"{"data":{"reference":"R-1"}}"#).unwrap();
        assert_eq!(env.data.unwrap().reference, "R-1");
    }

    #[test]
    fn test_list_payload_wrapped() {
        let payload: ListPayload<Material> =
            serde_json::from_str(r#"{"items":[{"id":"m1"},{"id":"m2"}]}"#).unwrap();
        assert_eq!(payload.into_items().len(), 2);
    }

    #[test]
    fn test_login_keeps_raw_role() {
        let env: Envelope<LoginData> = serde_json::from_str(
            r#"{"success":true,"data":{"token":"t","user":{"_id":"u1","role":"manager"}}}"#,
        )
        .unwrap();
        let login = env.data.unwrap();
        assert_eq!(login.user.role.as_deref(), Some("manager"));
        assert_eq!(login.user.id.as_str(), "u1");
    }

    #[test]
    fn test_auth_failure_classification() {
        assert!(ApiError::Unauthorized.is_auth_failure());
        assert!(
            ApiError::Status {
                status: 401,
                message: String::new()
            }
            .is_auth_failure()
        );
        assert!(
            !ApiError::Status {
                status: 503,
                message: String::new()
            }
            .is_auth_failure()
        );
        assert!(!ApiError::MissingData.is_auth_failure());
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Order::ENDPOINT, "trackers");
        assert_eq!(ServiceInstaller::KIND, CollectionKind::ServiceInstallers);
    }
}
