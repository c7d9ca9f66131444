//! Token Cache: single-slot store for the proxy's OAuth2 access token.
//!
//! The proxy authenticates as one identity, so there is exactly one slot.
//! A token is served only while `now < expires_at - SAFETY_MARGIN_MS`.
//!
//! Concurrency: the slot is guarded by an async `RwLock`, but reads and writes
//! are independent operations. Two requests that both miss will both acquire
//! and both overwrite the slot; the last write wins. That race only costs an
//! extra token exchange and is accepted.

use chrono::Utc;
use tokio::sync::RwLock;

/// Buffer subtracted from the reported expiry so a token never expires mid-flight.
pub const SAFETY_MARGIN_MS: i64 = 60_000;

/// An access token and the instant (epoch millis) it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at_epoch_millis: i64,
}

impl CachedToken {
    /// Whether the token can still be used at `now_millis`.
    pub fn is_fresh_at(&self, now_millis: i64) -> bool {
        now_millis < self.expires_at_epoch_millis - SAFETY_MARGIN_MS
    }
}

#[derive(Debug, Default)]
pub struct TokenCache {
    slot: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if still fresh. A stale token is left in the
    /// slot; the next `set` overwrites it.
    pub async fn get(&self) -> Option<CachedToken> {
        self.get_at(now_millis()).await
    }

    pub async fn get_at(&self, now_millis: i64) -> Option<CachedToken> {
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|cached| cached.is_fresh_at(now_millis))
            .cloned()
    }

    /// Stores `token` valid for `expires_in_secs` from now, replacing any previous value.
    pub async fn set(&self, token: String, expires_in_secs: i64) -> CachedToken {
        self.set_at(token, expires_in_secs, now_millis()).await
    }

    pub async fn set_at(&self, token: String, expires_in_secs: i64, now_millis: i64) -> CachedToken {
        let cached = CachedToken {
            token,
            expires_at_epoch_millis: now_millis.saturating_add(expires_in_secs.saturating_mul(1000)),
        };
        *self.slot.write().await = Some(cached.clone());
        cached
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[tokio::test]
    async fn test_empty_cache_is_a_miss() {
        let cache = TokenCache::new();
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn test_set_computes_expiry_from_seconds() {
        let cache = TokenCache::new();
        let cached = cache.set_at("abc".to_string(), 1499, NOW).await;
        assert_eq!(cached.expires_at_epoch_millis, NOW + 1_499_000);
    }

    #[tokio::test]
    async fn test_token_served_outside_safety_margin() {
        let cache = TokenCache::new();
        cache.set_at("abc".to_string(), 120, NOW).await;

        let hit = cache.get_at(NOW + 59_999).await;
        assert_eq!(hit.map(|c| c.token), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_token_stale_inside_safety_margin() {
        let cache = TokenCache::new();
        cache.set_at("abc".to_string(), 120, NOW).await;

        // expires at NOW + 120s; margin starts at NOW + 60s
        assert!(cache.get_at(NOW + 60_000).await.is_none());
        assert!(cache.get_at(NOW + 200_000).await.is_none());
    }

    #[tokio::test]
    async fn test_short_lived_token_is_never_served() {
        let cache = TokenCache::new();
        cache.set_at("abc".to_string(), 30, NOW).await;
        assert!(cache.get_at(NOW).await.is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_token() {
        let cache = TokenCache::new();
        cache.set_at("old".to_string(), 3600, NOW).await;
        cache.set_at("new".to_string(), 3600, NOW).await;

        let hit = cache.get_at(NOW).await;
        assert_eq!(hit.map(|c| c.token), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_stale_token_left_in_place_until_overwritten() {
        let cache = TokenCache::new();
        cache.set_at("abc".to_string(), 10, NOW).await;
        assert!(cache.get_at(NOW).await.is_none());
        assert!(cache.slot.read().await.is_some());
    }

    #[test]
    fn test_is_fresh_at_boundary() {
        let token = CachedToken {
            token: "t".to_string(),
            expires_at_epoch_millis: NOW + SAFETY_MARGIN_MS,
        };
        assert!(token.is_fresh_at(NOW - 1));
        assert!(!token.is_fresh_at(NOW));
    }
}
