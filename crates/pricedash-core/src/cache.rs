//! In-memory TTL cache for aggregated provider rows.
//!
//! Freshness is judged against an injected [`Clock`], so expiry can be tested
//! by moving a [`ManualClock`] instead of sleeping.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use time::OffsetDateTime;

/// Source of "now" for freshness checks.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: OffsetDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// How a fetch interacts with the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Serve a fresh entry if present; otherwise fetch and store. (Default)
    #[default]
    Use,
    /// Always fetch, then overwrite the stored entry.
    Refresh,
    /// Always fetch and leave the cache untouched.
    Bypass,
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: OffsetDateTime,
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, now: OffsetDateTime) -> bool {
        now - self.stored_at < self.ttl
    }
}

#[derive(Debug)]
struct CacheInner<T> {
    map: HashMap<String, CacheEntry<T>>,
    default_ttl: Duration,
}

/// Thread-safe keyed cache; clones share the same storage.
#[derive(Debug, Clone)]
pub struct CacheStore<T> {
    inner: Arc<tokio::sync::RwLock<CacheInner<T>>>,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> CacheStore<T> {
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner {
                map: HashMap::new(),
                default_ttl,
            })),
            clock,
        }
    }

    /// A cache whose puts are no-ops.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// The stored value, if it is still fresh according to the clock.
    pub async fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let store = self.inner.read().await;
        store
            .map
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn put(&self, key: impl Into<String>, value: T, ttl_override: Option<Duration>) {
        let stored_at = self.clock.now();
        let mut store = self.inner.write().await;
        if store.default_ttl == Duration::ZERO {
            return;
        }

        let ttl = ttl_override.unwrap_or(store.default_ttl);
        store.map.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at,
                ttl,
            },
        );
    }

    /// Whether `key` holds an entry younger than its TTL at `now`.
    pub async fn is_fresh(&self, key: &str, now: OffsetDateTime) -> bool {
        let store = self.inner.read().await;
        store.map.get(key).is_some_and(|entry| entry.is_fresh(now))
    }

    pub async fn clear_expired(&self) {
        let now = self.clock.now();
        let mut store = self.inner.write().await;
        store.map.retain(|_, entry| entry.is_fresh(now));
    }

    pub async fn clear(&self) {
        self.inner.write().await.map.clear();
    }

    /// Number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn is_disabled(&self) -> bool {
        self.inner.read().await.default_ttl == Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn manual_cache(ttl: Duration) -> (CacheStore<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(datetime!(2025-09-01 12:00 UTC)));
        (CacheStore::with_clock(ttl, clock.clone()), clock)
    }

    #[tokio::test]
    async fn put_then_get_returns_latest_value() {
        let (cache, _) = manual_cache(Duration::from_secs(60));

        assert!(cache.get("rows").await.is_none());
        cache.put("rows", String::from("v1"), None).await;
        assert_eq!(cache.get("rows").await.as_deref(), Some("v1"));
        cache.put("rows", String::from("v2"), None).await;
        assert_eq!(cache.get("rows").await.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn entry_expires_once_ttl_has_elapsed() {
        let (cache, clock) = manual_cache(Duration::from_secs(600));
        cache.put("rows", String::from("v1"), None).await;

        clock.advance(Duration::from_secs(599));
        assert!(cache.get("rows").await.is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get("rows").await.is_none());
    }

    #[tokio::test]
    async fn is_fresh_uses_the_given_instant() {
        let (cache, clock) = manual_cache(Duration::from_secs(60));
        cache.put("rows", String::from("v1"), None).await;

        let stored_at = clock.now();
        assert!(cache.is_fresh("rows", stored_at).await);
        assert!(cache.is_fresh("rows", stored_at + Duration::from_secs(59)).await);
        assert!(!cache.is_fresh("rows", stored_at + Duration::from_secs(60)).await);
        assert!(!cache.is_fresh("missing", stored_at).await);
    }

    #[tokio::test]
    async fn ttl_override_replaces_default() {
        let (cache, clock) = manual_cache(Duration::from_secs(600));
        cache
            .put("rows", String::from("v1"), Some(Duration::from_secs(5)))
            .await;

        clock.advance(Duration::from_secs(5));
        assert!(cache.get("rows").await.is_none());
    }

    #[tokio::test]
    async fn clear_expired_keeps_fresh_entries() {
        let (cache, clock) = manual_cache(Duration::from_secs(60));
        cache
            .put("short", String::from("a"), Some(Duration::from_secs(1)))
            .await;
        cache.put("long", String::from("b"), None).await;

        clock.advance(Duration::from_secs(2));
        cache.clear_expired().await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.get("long").await.is_some());
    }

    #[tokio::test]
    async fn disabled_cache_stores_nothing() {
        let cache: CacheStore<String> = CacheStore::disabled();
        assert!(cache.is_disabled().await);

        cache.put("rows", String::from("v1"), None).await;
        assert!(cache.get("rows").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[test]
    fn cache_mode_defaults_to_use() {
        assert_eq!(CacheMode::default(), CacheMode::Use);
    }
}
