//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::ConsoleConfig;
use crate::services::TokenCache;

/// Application state shared across all handlers.
///
/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ConsoleConfig,
    api: ApiClient,
    token_cache: TokenCache,
}

impl AppState {
    /// Build the shared backend client and verification cache from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ConsoleConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api_url, config.api_timeout)?;
        let token_cache = TokenCache::new(config.verify_cache_ttl);
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                token_cache,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    /// Unauthenticated backend client. Use [`ApiClient::authorized`] for user calls.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn token_cache(&self) -> &TokenCache {
        &self.inner.token_cache
    }
}
