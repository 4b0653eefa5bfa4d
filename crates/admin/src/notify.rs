//! Toast notifications.
//!
//! Toasts are queued in the session and drained by the next rendered page.
//! Queueing never fails the request: a session error is logged and the toast
//! is dropped.

use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::api::ApiError;
use crate::middleware::auth::{LOGIN_PATH, clear_auth_state};
use crate::models::session_keys;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastLevel {
    /// How long the toast stays on screen.
    #[must_use]
    pub const fn timeout_ms(self) -> u32 {
        match self {
            Self::Success | Self::Info => 5000,
            Self::Error => 7000,
            Self::Warning => 6000,
        }
    }

    /// Display time in whole seconds, for the CSS fade-out.
    #[must_use]
    pub const fn timeout_secs(self) -> u32 {
        self.timeout_ms() / 1000
    }

    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast toast-success",
            Self::Error => "toast toast-error",
            Self::Warning => "toast toast-warning",
            Self::Info => "toast toast-info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: Option<String>,
    pub message: String,
}

impl Toast {
    #[must_use]
    pub fn new(level: ToastLevel, title: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.map(str::to_owned),
            message: message.into(),
        }
    }
}

/// Queue a toast for the next rendered page.
pub async fn push(session: &Session, toast: Toast) {
    let mut queue = session
        .get::<Vec<Toast>>(session_keys::TOASTS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    queue.push(toast);

    if let Err(e) = session.insert(session_keys::TOASTS, queue).await {
        tracing::warn!(error = %e, "Failed to queue toast");
    }
}

pub async fn success(session: &Session, title: &str, message: impl Into<String>) {
    push(session, Toast::new(ToastLevel::Success, Some(title), message)).await;
}

pub async fn error(session: &Session, title: &str, message: impl Into<String>) {
    push(session, Toast::new(ToastLevel::Error, Some(title), message)).await;
}

pub async fn warning(session: &Session, title: &str, message: impl Into<String>) {
    push(session, Toast::new(ToastLevel::Warning, Some(title), message)).await;
}

pub async fn info(session: &Session, title: &str, message: impl Into<String>) {
    push(session, Toast::new(ToastLevel::Info, Some(title), message)).await;
}

/// Drain every queued toast.
pub async fn take(session: &Session) -> Vec<Toast> {
    match session.remove::<Vec<Toast>>(session_keys::TOASTS).await {
        Ok(toasts) => toasts.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read queued toasts");
            Vec::new()
        }
    }
}

/// Discard every queued toast.
pub async fn clear(session: &Session) {
    if let Err(e) = session.remove::<Vec<Toast>>(session_keys::TOASTS).await {
        tracing::warn!(error = %e, "Failed to clear toasts");
    }
}

/// Report a backend error to the user.
///
/// An expired session clears the stored token and returns the redirect to
/// the login page; the caller must return it. Every other error queues its
/// toast and returns `None` so the caller can pick the next page. Invalid
/// credentials queue nothing because the form shows the message inline.
pub async fn surface_api_error(session: &Session, err: &ApiError) -> Option<Response> {
    match err {
        ApiError::SessionExpired => {
            tracing::info!("Backend rejected token; logging out");
            if let Err(e) = clear_auth_state(session).await {
                tracing::warn!(error = %e, "Failed to clear expired session");
            }
            error(session, "Session expired", err.toast_message()).await;
            Some(Redirect::to(LOGIN_PATH).into_response())
        }
        ApiError::InvalidCredentials { .. } => None,
        _ => {
            if matches!(err, ApiError::Server { .. } | ApiError::Http(_)) {
                tracing::error!(error = %err, "Backend request failed");
            } else {
                tracing::warn!(error = %err, "Backend request rejected");
            }
            error(session, "Error", err.toast_message()).await;
            None
        }
    }
}
