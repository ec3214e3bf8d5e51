//! Client for the hosted authentication backend.
//!
//! Account creation is fully delegated: this service forwards validated
//! credentials to the provider's sign-up endpoint and relays the provider's
//! `Set-Cookie` headers back to the browser. Credential storage, password
//! hashing, and token issuance all happen upstream.

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode, header::SET_COOKIE};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const SIGNUP_PATH: &str = "signup";
const HEALTH_PATH: &str = "health";

/// Connection settings for the auth backend.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    base_url: Url,
    api_key: SecretString,
    timeout: Duration,
}

impl ProviderConfig {
    #[must_use]
    pub fn new(base_url: Url, api_key: SecretString) -> Self {
        Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }

    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Result of a successful sign-up call.
#[derive(Debug)]
pub struct SignupReceipt {
    /// Provider-assigned account id, when the response body carries one.
    pub user_id: Option<String>,
    /// Provider headers to relay to the browser (`Set-Cookie` only).
    pub headers: HeaderMap,
}

/// Dependency state reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStatus {
    /// Auth backend answered its health endpoint.
    Ok,
    /// Auth backend is unreachable or unhealthy.
    Error,
}

impl DependencyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// HTTP client for the auth backend's account endpoints.
#[derive(Debug)]
pub struct AuthProvider {
    config: ProviderConfig,
    client: Client,
}

impl AuthProvider {
    /// Build the client with the service user agent and configured timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    /// Create an account with the provider.
    ///
    /// One point-to-point call, no retries. Provider 4xx responses become
    /// [`ProviderError::Rejected`] with the provider's own message when the
    /// body carries one; transport failures become
    /// [`ProviderError::Unavailable`].
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignupReceipt, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(SIGNUP_PATH))
            .header("apikey", self.config.api_key.expose_secret())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(ProviderError::Unavailable)?;

        let status = response.status();
        if status.is_success() {
            let headers = relayed_headers(response.headers());
            let body = response.text().await.unwrap_or_default();
            let user_id = serde_json::from_str::<Value>(&body)
                .ok()
                .as_ref()
                .and_then(account_id)
                .map(str::to_string);
            debug!(user_id = user_id.as_deref().unwrap_or("unknown"), "account created");
            Ok(SignupReceipt { user_id, headers })
        } else if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let message = rejection_message(&body)
                .unwrap_or_else(|| "Signup was rejected by the authentication service".to_string());
            Err(ProviderError::Rejected { status, message })
        } else {
            Err(ProviderError::Unexpected { status })
        }
    }

    /// Probe the provider health endpoint for `/health` reporting.
    pub async fn dependency_status(&self) -> DependencyStatus {
        match self.client.get(self.endpoint(HEALTH_PATH)).send().await {
            Ok(response) if response.status().is_success() => DependencyStatus::Ok,
            Ok(response) => {
                warn!(status = %response.status(), "auth backend health probe failed");
                DependencyStatus::Error
            }
            Err(err) => {
                warn!("auth backend unreachable: {err}");
                DependencyStatus::Error
            }
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{path}",
            self.config.base_url.as_str().trim_end_matches('/')
        )
    }
}

/// Keep only the provider headers that belong on the browser response.
///
/// Relaying arbitrary upstream headers would leak transport metadata, so the
/// receipt carries `Set-Cookie` and nothing else.
fn relayed_headers(headers: &HeaderMap) -> HeaderMap {
    let mut relayed = HeaderMap::new();
    for value in headers.get_all(SET_COOKIE) {
        relayed.append(SET_COOKIE, value.clone());
    }
    relayed
}

/// Pull a user-facing message out of a provider error body.
///
/// Providers differ on the field name, so the common ones are tried in order.
fn rejection_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn account_id(value: &Value) -> Option<&str> {
    value
        .get("id")
        .or_else(|| value.get("user").and_then(|user| user.get("id")))
        .and_then(Value::as_str)
}

/// Errors from the sign-up call, surfaced to the handler so it can pick the
/// response status.
#[derive(Debug)]
pub enum ProviderError {
    /// Provider refused the account (duplicate email, policy violation, ...).
    Rejected { status: StatusCode, message: String },
    /// Provider could not be reached.
    Unavailable(reqwest::Error),
    /// Provider answered with an unexpected status.
    Unexpected { status: StatusCode },
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Rejected { status, message } => {
                write!(f, "auth backend rejected signup ({status}): {message}")
            }
            ProviderError::Unavailable(err) => write!(f, "auth backend unreachable: {err}"),
            ProviderError::Unexpected { status } => {
                write!(f, "auth backend returned unexpected status {status}")
            }
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Unavailable(err) => Some(err),
            _ => None,
        }
    }
}
