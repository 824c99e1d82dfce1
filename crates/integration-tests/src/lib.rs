//! Integration test harness for Cephas Tracker.
//!
//! Every test gets its own fake tracker API and its own panel, both bound
//! to `127.0.0.1:0` inside the test process. Nothing external is needed:
//!
//! ```bash
//! cargo test -p cephas-integration-tests
//! ```
//!
//! The fake API accepts [`PASSWORD`] for every configured [`Account`],
//! serves collections as `{ success, data }` envelopes and answers 503 for
//! endpoints marked failing.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use cephas_panel::config::{ApiConfig, PanelConfig, PollConfig};
use cephas_panel::middleware::{SessionBackend, session_key};
use cephas_panel::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower_sessions::MemoryStore;

/// Password the fake API accepts for every account.
pub const PASSWORD: &str = "field-work-2025";

/// Reset token the fake API accepts.
pub const RESET_TOKEN: &str = "reset-ok";

/// 64 characters of mixed text, enough for a cookie signing key.
const SESSION_SECRET: &str = "q7Vw2mLx9Rt4Kp8Zs1Nd6Hy3Bc5Fg0Jq7Vw2mLx9Rt4Kp8Zs1Nd6Hy3Bc5Fg0Jkm";

/// One account the fake API signs in.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub role: Option<&'static str>,
}

impl Account {
    #[must_use]
    pub const fn new(id: &'static str, email: &'static str, role: Option<&'static str>) -> Self {
        Self {
            id,
            name: "Test User",
            email,
            role,
        }
    }

    fn token(&self) -> String {
        format!("token-{}", self.id)
    }
}

/// Behavior of the fake tracker API.
#[derive(Debug, Default)]
pub struct Upstream {
    accounts: Vec<Account>,
    collections: HashMap<String, Value>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl Upstream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Serve `records` at `/api/{endpoint}`.
    #[must_use]
    pub fn collection(mut self, endpoint: &str, records: Value) -> Self {
        self.collections.insert(endpoint.to_owned(), records);
        self
    }

    /// Answer 503 at `/api/{endpoint}`.
    #[must_use]
    pub fn failing(mut self, endpoint: &str) -> Self {
        self.failing.insert(endpoint.to_owned());
        self
    }

    /// Collection endpoints fetched so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the call log lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn bearer_is_known(&self, headers: &HeaderMap) -> bool {
        let Some(token) = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
        else {
            return false;
        };
        self.accounts.iter().any(|a| a.token() == token)
    }
}

fn envelope_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

async fn upstream_login(
    State(upstream): State<Arc<Upstream>>,
    Json(body): Json<Value>,
) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let Some(account) = upstream
        .accounts
        .iter()
        .find(|a| a.email.eq_ignore_ascii_case(email))
        .filter(|_| password == PASSWORD)
    else {
        return envelope_error(StatusCode::BAD_REQUEST, "Invalid credentials");
    };
    Json(json!({
        "success": true,
        "data": {
            "token": account.token(),
            "user": {
                "_id": account.id,
                "name": account.name,
                "email": account.email,
                "role": account.role,
            }
        }
    }))
    .into_response()
}

async fn upstream_forgot_password(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    Json(json!({ "success": true, "message": format!("Reset link sent to {email}") }))
        .into_response()
}

async fn upstream_reset_password(Json(body): Json<Value>) -> Response {
    if body["token"].as_str() == Some(RESET_TOKEN) {
        Json(json!({ "success": true, "message": "Password updated" })).into_response()
    } else {
        envelope_error(StatusCode::BAD_REQUEST, "Token expired")
    }
}

#[allow(clippy::unwrap_used)]
async fn upstream_collection(
    State(upstream): State<Arc<Upstream>>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !upstream.bearer_is_known(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    upstream.calls.lock().unwrap().push(endpoint.clone());
    if upstream.failing.contains(&endpoint) {
        return envelope_error(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable");
    }
    let data = upstream
        .collections
        .get(&endpoint)
        .cloned()
        .unwrap_or_else(|| json!([]));
    Json(json!({ "success": true, "data": data })).into_response()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

/// Panel configuration pointing at the fake API.
///
/// # Panics
///
/// Panics if the API URL does not parse.
#[must_use]
pub fn panel_config(api_addr: SocketAddr) -> PanelConfig {
    PanelConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://127.0.0.1".to_owned(),
        session_secret: SecretString::from(SESSION_SECRET),
        database_url: None,
        api: ApiConfig::new(&format!("http://{api_addr}/api"), Duration::from_secs(5))
            .expect("Invalid fake API URL"),
        poll: PollConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// A running fake API plus a panel wired to it.
pub struct TestApp {
    pub panel_url: String,
    /// Client with a cookie store that never follows redirects.
    pub client: reqwest::Client,
    pub upstream: Arc<Upstream>,
    pub state: AppState,
}

impl TestApp {
    /// Start both servers.
    ///
    /// # Panics
    ///
    /// Panics if either server fails to start.
    pub async fn spawn(upstream: Upstream) -> Self {
        let upstream = Arc::new(upstream);
        let fake_api = Router::new()
            .route("/api/", get(|| async { "tracker api" }))
            .route("/api/auth/login", post(upstream_login))
            .route("/api/auth/forgot-password", post(upstream_forgot_password))
            .route("/api/auth/reset-password", post(upstream_reset_password))
            .route("/api/{endpoint}", get(upstream_collection))
            .with_state(Arc::clone(&upstream));
        let api_addr = serve(fake_api).await;

        let config = panel_config(api_addr);
        let key = session_key(&config).expect("Invalid session secret");
        let state = AppState::new(config).expect("Failed to build panel state");
        let app = cephas_panel::app(
            state.clone(),
            SessionBackend::Memory(MemoryStore::default()),
            key,
        );
        let panel_addr = serve(app).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            panel_url: format!("http://{panel_addr}"),
            client,
            upstream,
            state,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.panel_url)
    }

    /// GET a panel path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Panel request failed")
    }

    /// Submit the login form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("Login request failed")
    }

    /// Submit the logout form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn logout(&self) -> reqwest::Response {
        self.client
            .post(self.url("/logout"))
            .send()
            .await
            .expect("Logout request failed")
    }
}

/// The `Location` header of a redirect, or an empty string.
#[must_use]
pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Accounts for every role plus one the panel does not know.
#[must_use]
pub fn standard_accounts(upstream: Upstream) -> Upstream {
    upstream
        .account(Account::new("u-admin", "admin@cephas.test", Some("super-admin")))
        .account(Account::new("u-sup", "supervisor@cephas.test", Some("supervisor")))
        .account(Account::new("u-inst", "installer@cephas.test", Some("installer")))
        .account(Account::new("u-acct", "accountant@cephas.test", Some("accountant")))
        .account(Account::new("u-wh", "warehouse@cephas.test", Some("warehouse")))
        .account(Account::new("u-mgr", "manager@cephas.test", Some("manager")))
}
