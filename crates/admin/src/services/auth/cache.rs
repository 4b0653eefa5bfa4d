//! Short-lived cache of successful token verifications.
//!
//! Keys are SHA-256 digests of the token so raw tokens never sit in the cache.
//! Only positive results are stored.

use std::time::Duration;

use moka::future::Cache;
use sha2::{Digest, Sha256};

/// Upper bound on cached tokens.
const MAX_ENTRIES: u64 = 10_000;

/// Cache of tokens the backend recently confirmed as valid.
#[derive(Clone)]
pub struct TokenCache {
    cache: Option<Cache<String, ()>>,
}

impl TokenCache {
    /// A zero TTL disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build()
        });
        Self { cache }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Whether `token` was verified within the TTL.
    pub async fn contains(&self, token: &str) -> bool {
        match &self.cache {
            Some(cache) => cache.get(&digest(token)).await.is_some(),
            None => false,
        }
    }

    /// Record a successful verification.
    pub async fn remember(&self, token: &str) {
        if let Some(cache) = &self.cache {
            cache.insert(digest(token), ()).await;
        }
    }

    /// Drop a token, e.g. on logout.
    pub async fn forget(&self, token: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&digest(token)).await;
        }
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
