//! Console authentication service.
//!
//! The backend issues bearer tokens; the console keeps the token and a
//! [`CurrentUser`] snapshot in the session and re-checks the token with
//! `GET /users/verify` before serving protected pages.

mod cache;
mod error;

pub use cache::TokenCache;
pub use error::AuthError;

use tower_sessions::Session;
use tracing::instrument;

use crate::api::{ApiClient, CreateUserRequest, LoginRequest, User};
use crate::middleware::auth::{clear_auth_state, set_auth_state};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Authentication operations bound to one request's session.
pub struct AuthService<'a> {
    api: &'a ApiClient,
    cache: &'a TokenCache,
    session: &'a Session,
}

impl<'a> AuthService<'a> {
    /// Create a service over an unauthenticated client.
    #[must_use]
    pub const fn new(api: &'a ApiClient, cache: &'a TokenCache, session: &'a Session) -> Self {
        Self {
            api,
            cache,
            session,
        }
    }

    #[must_use]
    pub fn from_state(state: &'a AppState, session: &'a Session) -> Self {
        Self::new(state.api(), state.token_cache(), session)
    }

    /// The stored bearer token, if present and non-empty.
    pub async fn token(&self) -> Option<String> {
        self.session
            .get::<String>(session_keys::AUTH_TOKEN)
            .await
            .ok()
            .flatten()
            .filter(|token| !token.trim().is_empty())
    }

    /// The stored user snapshot.
    pub async fn current_user(&self) -> Option<CurrentUser> {
        self.session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
    }

    /// A token is present. Says nothing about whether the backend still accepts it.
    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }

    /// Log in and store the token and user in a fresh session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` if the backend rejects the credentials, or
    /// `AuthError::Session` if the session cannot be updated.
    #[instrument(skip(self, request), fields(username = %request.username_or_email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<CurrentUser, AuthError> {
        let response = self.api.login(request).await?;
        let user = CurrentUser::from(&response.user);

        // New privilege level, new session id.
        self.session.cycle_id().await?;
        set_auth_state(self.session, &response.token, &user).await?;
        self.cache.remember(&response.token).await;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(user)
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` if the backend rejects the registration.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &CreateUserRequest) -> Result<User, AuthError> {
        let user = self.api.register(request).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Log out. Backend failures are logged and ignored; local state is always cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Some(token) = self.token().await {
            if let Err(e) = self.api.authorized(&token).logout().await {
                tracing::warn!(error = %e, "Backend logout failed; clearing local session anyway");
            }
            self.cache.forget(&token).await;
        }
        if let Err(e) = clear_auth_state(self.session).await {
            tracing::warn!(error = %e, "Failed to clear session on logout");
        }
        if let Err(e) = self.session.cycle_id().await {
            tracing::warn!(error = %e, "Failed to cycle session id on logout");
        }
    }

    /// Check the stored token with the backend.
    ///
    /// Without a token this returns `false` without contacting the backend.
    /// A rejected token, or any error while checking, clears the stored
    /// token and user.
    #[instrument(skip(self))]
    pub async fn validate_token(&self) -> bool {
        let Some(token) = self.token().await else {
            return false;
        };

        if self.cache.contains(&token).await {
            return true;
        }

        match self.api.authorized(&token).verify_token().await {
            Ok(response) if response.valid => {
                self.cache.remember(&token).await;
                true
            }
            Ok(_) => {
                tracing::info!("Backend reports token invalid");
                self.discard().await;
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token verification failed");
                self.discard().await;
                false
            }
        }
    }

    /// Replace the stored user snapshot, e.g. after a profile update.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn refresh_user(&self, user: &User) -> Result<(), AuthError> {
        self.session
            .insert(session_keys::CURRENT_USER, CurrentUser::from(user))
            .await?;
        Ok(())
    }

    async fn discard(&self) {
        if let Err(e) = clear_auth_state(self.session).await {
            tracing::warn!(error = %e, "Failed to clear rejected token");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tower_sessions::MemoryStore;
    use url::Url;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn unreachable_api() -> ApiClient {
        // Port 9 (discard) is never served in tests; any request would fail.
        ApiClient::new(
            &Url::parse("http://127.0.0.1:9").unwrap(),
            Duration::from_millis(200),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_no_token_is_not_authenticated() {
        let api = unreachable_api();
        let cache = TokenCache::new(Duration::from_secs(30));
        let session = session();
        let auth = AuthService::new(&api, &cache, &session);

        assert!(!auth.is_authenticated().await);
        assert!(!auth.validate_token().await);
    }

    #[tokio::test]
    async fn test_empty_token_counts_as_absent() {
        let api = unreachable_api();
        let cache = TokenCache::new(Duration::from_secs(30));
        let session = session();
        session
            .insert(session_keys::AUTH_TOKEN, String::new())
            .await
            .unwrap();
        let auth = AuthService::new(&api, &cache, &session);

        assert!(!auth.is_authenticated().await);
        assert!(!auth.validate_token().await);
    }

    #[tokio::test]
    async fn test_cached_token_skips_backend() {
        let api = unreachable_api();
        let cache = TokenCache::new(Duration::from_secs(30));
        let session = session();
        session
            .insert(session_keys::AUTH_TOKEN, "tok-1".to_string())
            .await
            .unwrap();
        cache.remember("tok-1").await;
        let auth = AuthService::new(&api, &cache, &session);

        assert!(auth.validate_token().await);
        assert!(auth.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_verification_error_clears_state() {
        let api = unreachable_api();
        let cache = TokenCache::new(Duration::ZERO);
        let session = session();
        session
            .insert(session_keys::AUTH_TOKEN, "tok-2".to_string())
            .await
            .unwrap();
        let auth = AuthService::new(&api, &cache, &session);

        assert!(!auth.validate_token().await);
        assert!(auth.token().await.is_none());
        assert!(auth.current_user().await.is_none());
    }
}
