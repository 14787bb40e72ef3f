//! In-memory cache of Bungie.net OAuth access tokens.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Access tokens keyed by Bungie.net membership id.
///
/// Tokens are handed out until they expire. Expired entries are ignored by `get` and removed
/// by `evict_expired`, which the scheduler runs periodically.
#[derive(Clone, Default)]
pub struct AuthTokenCache {
    tokens: Arc<RwLock<HashMap<i64, CachedToken>>>,
}

impl AuthTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a still valid access token.
    ///
    /// # Arguments
    /// - `bungie_id` - Bungie.net membership id
    ///
    /// # Returns
    /// - `Some(token)` - Cached token that has not expired
    /// - `None` - No token cached or the cached one expired
    pub async fn get(&self, bungie_id: i64) -> Option<String> {
        let now = Instant::now();

        self.tokens
            .read()
            .await
            .get(&bungie_id)
            .filter(|token| !token.is_expired(now))
            .map(|token| token.access_token.clone())
    }

    /// Stores an access token valid for `ttl`, replacing any previous one.
    pub async fn put(&self, bungie_id: i64, access_token: String, ttl: Duration) {
        let token = CachedToken {
            access_token,
            expires_at: Instant::now() + ttl,
        };

        self.tokens.write().await.insert(bungie_id, token);
    }

    /// Removes every expired token.
    ///
    /// # Returns
    /// - `usize` - Number of evicted tokens
    pub async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();

        tokens.retain(|_, token| !token.is_expired(now));

        before - tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests reading back a fresh token.
    ///
    /// Expected: token returned for its own id only
    #[tokio::test]
    async fn returns_valid_token() {
        let cache = AuthTokenCache::new();
        cache
            .put(1, "access".to_string(), Duration::from_secs(3600))
            .await;

        assert_eq!(cache.get(1).await.as_deref(), Some("access"));
        assert_eq!(cache.get(2).await, None);
    }

    /// Tests that expired tokens are hidden and evicted.
    ///
    /// Expected: expired token not returned, eviction removes only it
    #[tokio::test]
    async fn evicts_expired_tokens() {
        let cache = AuthTokenCache::new();
        cache.put(1, "stale".to_string(), Duration::ZERO).await;
        cache
            .put(2, "fresh".to_string(), Duration::from_secs(3600))
            .await;

        assert_eq!(cache.get(1).await, None);
        assert_eq!(cache.evict_expired().await, 1);
        assert_eq!(cache.get(2).await.as_deref(), Some("fresh"));
        assert_eq!(cache.evict_expired().await, 0);
    }
}
