//! REST client for the OrderDesk backend.
//!
//! [`ApiClient`] wraps one pooled `reqwest::Client`. Clones are cheap; a clone
//! made with [`ApiClient::authorized`] attaches `Authorization: Bearer <token>`
//! to every request it sends. Non-2xx responses are classified into
//! [`ApiError`] so callers can decide between a toast and a forced logout.
//!
//! Endpoint methods live in one `impl ApiClient` block per resource:
//!
//! - `users` - login, logout, verify, register, profile, user management
//! - `customers` - customers and their addresses
//! - `products` - products, stock, categories
//! - `orders` - orders, stats, lifecycle transitions
//! - `payments` - payments and payment stats
//! - `reports` - scheduled reports, dashboard summary, daily stats

pub mod endpoints;
pub mod types;

mod customers;
mod orders;
mod payments;
mod products;
mod reports;
mod users;

pub use orders::{DEFAULT_PAYMENT_METHOD, TransitionOutcome};
pub use reports::DEFAULT_DAILY_STATS_DAYS;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Default `Retry-After` when a 429 carries none.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Errors returned by [`ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 from the login or register endpoint.
    #[error("invalid credentials")]
    InvalidCredentials { message: Option<String> },

    /// 401 from any other endpoint: the token is missing, expired, or revoked.
    #[error("session expired")]
    SessionExpired,

    /// 403.
    #[error("forbidden: {path}")]
    Forbidden { path: String },

    /// 400.
    #[error("bad request: {path}")]
    BadRequest {
        path: String,
        message: Option<String>,
    },

    /// 404.
    #[error("not found: {path}")]
    NotFound {
        path: String,
        message: Option<String>,
    },

    /// 429.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// 5xx.
    #[error("server error {status} on {path}")]
    Server { status: u16, path: String },

    /// Any other non-success status.
    #[error("unexpected status {status} on {path}")]
    Status {
        status: u16,
        path: String,
        message: Option<String>,
    },

    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The body of a successful response did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response.
    #[must_use]
    pub fn from_status(
        status: u16,
        path: &str,
        message: Option<String>,
        retry_after: Option<u64>,
    ) -> Self {
        let path = path.to_string();
        match status {
            401 if is_credentials_endpoint(&path) => Self::InvalidCredentials { message },
            401 => Self::SessionExpired,
            403 => Self::Forbidden { path },
            400 => Self::BadRequest { path, message },
            404 => Self::NotFound { path, message },
            429 => Self::RateLimited(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
            500..=599 => Self::Server { status, path },
            _ => Self::Status {
                status,
                path,
                message,
            },
        }
    }

    /// HTTP status that produced this error, when there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidCredentials { .. } | Self::SessionExpired => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::BadRequest { .. } => Some(400),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited(_) => Some(429),
            Self::Server { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Http(_) | Self::Decode(_) => None,
        }
    }

    /// The backend's `error` text, when it sent one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::InvalidCredentials { message }
            | Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Reclassify an error from a credentials endpoint called by a signed-in
    /// user, such as an admin creating an account through `/users/register`.
    /// A 401 there rejects the caller's token, not the submitted credentials.
    #[must_use]
    pub fn signed_in(self) -> Self {
        match self {
            Self::InvalidCredentials { .. } => Self::SessionExpired,
            other => other,
        }
    }

    /// Only an expired session forces the user back to the login page.
    #[must_use]
    pub const fn requires_logout(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Text shown to the user in an error toast.
    #[must_use]
    pub fn toast_message(&self) -> String {
        match self {
            Self::InvalidCredentials { message } => message
                .clone()
                .unwrap_or_else(|| "Invalid username or password.".to_string()),
            Self::SessionExpired => "Session expired. Please login again.".to_string(),
            Self::Forbidden { .. } => {
                "Access forbidden. You do not have permission to perform this action.".to_string()
            }
            Self::BadRequest { message, .. } => message
                .clone()
                .unwrap_or_else(|| "Invalid request. Please check your input.".to_string()),
            Self::NotFound { message, .. } => message
                .clone()
                .unwrap_or_else(|| "The requested record was not found.".to_string()),
            Self::RateLimited(seconds) => {
                format!("Too many requests. Please try again in {seconds} seconds.")
            }
            Self::Server { .. } => "Server error occurred. Please try again later.".to_string(),
            Self::Status {
                status, message, ..
            } => message
                .clone()
                .unwrap_or_else(|| format!("Request failed with status {status}.")),
            Self::Http(_) => "Unable to reach the server. Please try again later.".to_string(),
            Self::Decode(_) => "Unexpected response from the server.".to_string(),
        }
    }
}

fn is_credentials_endpoint(path: &str) -> bool {
    path.contains("/login") || path.contains("/register")
}

/// Client for the OrderDesk REST backend.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    token: Option<SecretString>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    /// Create an unauthenticated client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("orderdesk-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
            }),
            token: None,
        })
    }

    /// A clone that sends `token` as a bearer token.
    ///
    /// An empty token yields a client that sends no `Authorization` header.
    #[must_use]
    pub fn authorized(&self, token: &str) -> Self {
        let token = token.trim();
        Self {
            inner: Arc::clone(&self.inner),
            token: (!token.is_empty()).then(|| SecretString::from(token.to_string())),
        }
    }

    /// Whether requests from this client carry a bearer token.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let builder = self.inner.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path), &Method::GET, path)
            .await
    }

    /// Execute a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(
            self.request(Method::GET, path).query(query),
            &Method::GET,
            path,
        )
        .await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(
            self.request(Method::POST, path).json(body),
            &Method::POST,
            path,
        )
        .await
    }

    /// Execute a PUT request with a JSON body.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(
            self.request(Method::PUT, path).json(body),
            &Method::PUT,
            path,
        )
        .await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::DELETE, path), &Method::DELETE, path)
            .await
    }

    #[instrument(
        name = "api_request",
        skip(self, builder),
        fields(method = %method, path = %path, status = tracing::field::Empty)
    )]
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &Method,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Backend request failed");
            ApiError::Http(e)
        })?;
        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());

        if status.is_success() {
            return Self::handle_response(response).await;
        }

        let error = Self::parse_error(response, path).await;
        if matches!(error, ApiError::Server { .. }) {
            tracing::error!(error = %error, "Backend server error");
        } else {
            tracing::debug!(error = %error, "Backend rejected request");
        }
        Err(error)
    }

    /// Decode a successful response. An empty body decodes as `{}`.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Turn a non-success response into an [`ApiError`].
    async fn parse_error(response: reqwest::Response, path: &str) -> ApiError {
        let status = response.status();

        let retry_after = (status == StatusCode::TOO_MANY_REQUESTS)
            .then(|| {
                response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse().ok())
            })
            .flatten();

        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| error_message(&bytes));

        ApiError::from_status(status.as_u16(), path, message, retry_after)
    }
}

/// Pull `error` (or `message`) out of a JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(
            &Url::parse("http://127.0.0.1:9/api/").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_401_on_login_is_invalid_credentials() {
        let err = ApiError::from_status(401, "/users/login", Some("Bad password".into()), None);
        assert!(matches!(err, ApiError::InvalidCredentials { .. }));
        assert!(!err.requires_logout());
        assert_eq!(err.toast_message(), "Bad password");
    }

    #[test]
    fn test_401_on_register_is_invalid_credentials() {
        let err = ApiError::from_status(401, "/users/register", None, None);
        assert!(matches!(err, ApiError::InvalidCredentials { .. }));
        assert!(!err.requires_logout());
    }

    #[test]
    fn test_signed_in_register_401_is_session_expiry() {
        let err = ApiError::from_status(401, "/users/register", None, None).signed_in();
        assert!(matches!(err, ApiError::SessionExpired));
        assert!(err.requires_logout());

        let err = ApiError::from_status(400, "/users/register", None, None).signed_in();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[test]
    fn test_401_elsewhere_forces_logout() {
        for path in ["/orders", "/users/verify", "/users/logout", "/users/profile"] {
            let err = ApiError::from_status(401, path, None, None);
            assert!(err.requires_logout(), "{path}");
            assert_eq!(err.toast_message(), "Session expired. Please login again.");
        }
    }

    #[test]
    fn test_toast_messages_by_status() {
        assert_eq!(
            ApiError::from_status(403, "/users", None, None).toast_message(),
            "Access forbidden. You do not have permission to perform this action."
        );
        assert_eq!(
            ApiError::from_status(400, "/orders", None, None).toast_message(),
            "Invalid request. Please check your input."
        );
        assert_eq!(
            ApiError::from_status(400, "/orders", Some("Insufficient stock".into()), None)
                .toast_message(),
            "Insufficient stock"
        );
        assert_eq!(
            ApiError::from_status(500, "/orders", Some("boom".into()), None).toast_message(),
            "Server error occurred. Please try again later."
        );
    }

    #[test]
    fn test_other_statuses() {
        let err = ApiError::from_status(404, "/orders/9", None, None);
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));

        let err = ApiError::from_status(429, "/orders", None, Some(5));
        assert!(matches!(err, ApiError::RateLimited(5)));
        let err = ApiError::from_status(429, "/orders", None, None);
        assert!(matches!(err, ApiError::RateLimited(DEFAULT_RETRY_AFTER_SECS)));

        let err = ApiError::from_status(503, "/orders", None, None);
        assert!(matches!(err, ApiError::Server { status: 503, .. }));

        let err = ApiError::from_status(409, "/orders", Some("Conflict".into()), None);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.toast_message(), "Conflict");
        assert!(!err.requires_logout());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(br#"{"error": "Order not found"}"#),
            Some("Order not found".to_string())
        );
        assert_eq!(
            error_message(br#"{"message": "nope"}"#),
            Some("nope".to_string())
        );
        assert_eq!(error_message(br#"{"error": "  "}"#), None);
        assert_eq!(error_message(b"<html>"), None);
    }

    #[test]
    fn test_authorized_ignores_empty_token() {
        let base = client();
        assert!(!base.has_token());
        assert!(base.authorized("abc").has_token());
        assert!(!base.authorized("").has_token());
        assert!(!base.authorized("   ").has_token());
    }

    #[test]
    fn test_base_url_is_trimmed_and_debug_redacts() {
        let api = client().authorized("very-private-token");
        assert_eq!(api.base_url(), "http://127.0.0.1:9/api");
        let debug = format!("{api:?}");
        assert!(!debug.contains("very-private-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
