//! Authentication guards for console routes.
//!
//! [`RequireAuth`] validates the session's bearer token with the backend
//! before the handler runs and hands the handler an authorized
//! [`ApiClient`]. [`RequireAdmin`] additionally requires the `admin` role.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{Method, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::api::ApiClient;
use crate::error::{AppError, set_sentry_user};
use crate::models::{CurrentUser, session_keys};
use crate::notify;
use crate::services::AuthService;
use crate::state::AppState;

/// Where logged-in users land by default.
pub const DEFAULT_LANDING: &str = "/dashboard";

pub const LOGIN_PATH: &str = "/auth/login";

/// Authenticated request context handed to protected handlers.
#[derive(Clone)]
pub struct AuthContext {
    pub user: CurrentUser,
    /// Client carrying the user's bearer token.
    pub api: ApiClient,
    pub session: Session,
}

/// Extractor that requires a valid backend token.
///
/// Rejected requests are redirected to `/auth/login?returnUrl=...`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(ctx): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", ctx.user.username)
/// }
/// ```
pub struct RequireAuth(pub AuthContext);

/// Extractor that requires a valid token and the `admin` role.
///
/// Non-admins are sent to the dashboard with a warning toast.
pub struct RequireAdmin(pub AuthContext);

/// Why a guarded request was turned away.
#[derive(Debug)]
pub enum AuthRejection {
    /// Not logged in, or the backend no longer accepts the token.
    RedirectToLogin { return_to: Option<String> },
    /// Logged in without the required role.
    NotAdmin,
    /// The session layer is missing from the router.
    MissingSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { return_to } => {
                Redirect::to(&login_redirect(return_to.as_deref())).into_response()
            }
            Self::NotAdmin => Redirect::to(DEFAULT_LANDING).into_response(),
            Self::MissingSession => {
                AppError::Internal("session layer missing from router".to_string()).into_response()
            }
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::MissingSession)?;

        let return_to = return_target(parts);
        let reject = || AuthRejection::RedirectToLogin {
            return_to: return_to.clone(),
        };

        let auth = AuthService::from_state(state, &session);
        if !auth.validate_token().await {
            return Err(reject());
        }

        let (Some(token), Some(user)) = (auth.token().await, auth.current_user().await) else {
            // Token without a user snapshot: treat as logged out.
            if let Err(e) = clear_auth_state(&session).await {
                tracing::warn!(error = %e, "Failed to clear incomplete auth state");
            }
            return Err(reject());
        };

        set_sentry_user(user.id, Some(&user.email));

        Ok(Self(AuthContext {
            api: state.api().authorized(&token),
            user,
            session,
        }))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(ctx) = RequireAuth::from_request_parts(parts, state).await?;

        if !ctx.user.is_admin() {
            tracing::warn!(user_id = %ctx.user.id, path = %parts.uri.path(), "Non-admin denied");
            notify::warning(
                &ctx.session,
                "Access denied",
                "Only administrators can manage users.",
            )
            .await;
            return Err(AuthRejection::NotAdmin);
        }

        Ok(Self(ctx))
    }
}

/// Path and query to come back to after login. Only page loads are
/// remembered; replaying a form submission after login makes no sense.
fn return_target(parts: &Parts) -> Option<String> {
    if parts.method != Method::GET {
        return None;
    }
    // Nested routers see the URI with their prefix stripped.
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0);
    uri.path_and_query().map(|pq| pq.as_str().to_string())
}

/// Login URL carrying the page to return to.
#[must_use]
pub fn login_redirect(return_to: Option<&str>) -> String {
    match return_to {
        Some(target) if is_local_path(target) => {
            format!("{LOGIN_PATH}?returnUrl={}", urlencoding::encode(target))
        }
        _ => LOGIN_PATH.to_string(),
    }
}

/// Post-login destination: `return_url` if it is a local path, else the dashboard.
#[must_use]
pub fn safe_return_url(return_url: Option<&str>) -> String {
    return_url
        .map(str::trim)
        .filter(|url| is_local_path(url))
        .map_or_else(|| DEFAULT_LANDING.to_string(), str::to_owned)
}

fn is_local_path(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\")
}

/// Store the bearer token and user snapshot.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_auth_state(
    session: &Session,
    token: &str,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_TOKEN, token).await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Drop the bearer token and user snapshot. Pending toasts survive.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_auth_state(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<String>(session_keys::AUTH_TOKEN).await?;
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use orderdesk_core::{UserId, UserRole};
    use tower_sessions::MemoryStore;

    use super::*;

    #[test]
    fn test_safe_return_url() {
        assert_eq!(safe_return_url(Some("/orders/5")), "/orders/5");
        assert_eq!(
            safe_return_url(Some("/orders?status=paid")),
            "/orders?status=paid"
        );
        assert_eq!(safe_return_url(Some("//evil.example")), "/dashboard");
        assert_eq!(safe_return_url(Some("/\\evil.example")), "/dashboard");
        assert_eq!(safe_return_url(Some("https://evil.example")), "/dashboard");
        assert_eq!(safe_return_url(Some("")), "/dashboard");
        assert_eq!(safe_return_url(None), "/dashboard");
    }

    #[test]
    fn test_login_redirect_encodes_return_url() {
        assert_eq!(
            login_redirect(Some("/orders?status=paid")),
            "/auth/login?returnUrl=%2Forders%3Fstatus%3Dpaid"
        );
        assert_eq!(login_redirect(None), "/auth/login");
        assert_eq!(login_redirect(Some("//evil.example")), "/auth/login");
    }

    fn request_parts(method: Method, uri: &str) -> Parts {
        let (parts, ()) = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_return_target_prefers_original_uri() {
        // What a nested router sees for GET /orders/5?tab=items
        let mut parts = request_parts(Method::GET, "/5?tab=items");
        parts
            .extensions
            .insert(OriginalUri("/orders/5?tab=items".parse().unwrap()));
        assert_eq!(
            return_target(&parts).as_deref(),
            Some("/orders/5?tab=items")
        );

        let parts = request_parts(Method::GET, "/dashboard");
        assert_eq!(return_target(&parts).as_deref(), Some("/dashboard"));

        let parts = request_parts(Method::POST, "/orders/5/cancel");
        assert_eq!(return_target(&parts), None);
    }

    #[tokio::test]
    async fn test_clear_auth_state_keeps_toasts() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let user = CurrentUser {
            id: UserId::new(1),
            username: "ana".to_string(),
            email: "ana@shop.io".to_string(),
            role: UserRole::Admin,
        };
        set_auth_state(&session, "tok", &user).await.unwrap();
        notify::info(&session, "Heads up", "still here").await;

        clear_auth_state(&session).await.unwrap();

        assert!(
            session
                .get::<String>(session_keys::AUTH_TOKEN)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(notify::take(&session).await.len(), 1);
    }
}
