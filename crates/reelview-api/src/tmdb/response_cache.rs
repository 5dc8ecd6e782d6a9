//! TMDB API response cache.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use moka::Expiry;
use moka::future::Cache;

/// Default lifetime of a cached response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Upper bound on cached responses.
const MAX_ENTRIES: u64 = 10_000;

/// A cached body with the lifetime it was stored for.
#[derive(Debug, Clone)]
struct CachedBody {
    body: Arc<str>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was inserted with.
struct BodyExpiry;

impl Expiry<String, CachedBody> for BodyExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedBody,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory cache of accepted response bodies keyed by request signature.
///
/// The signature is the request path plus its query parameters in sorted
/// order. Credentials are never part of the key. Concurrent misses on the
/// same key share one fetch, and failed fetches are not stored.
#[derive(Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct ResponseCache {
    entries: Cache<String, CachedBody>,
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl ResponseCache {
    /// Creates an empty cache.
    pub(crate) fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .expire_after(BodyExpiry)
                .build(),
        }
    }

    /// Builds the request signature used as cache key.
    pub(crate) fn cache_key(path: &str, query: &[(&str, String)]) -> String {
        let mut pairs: Vec<String> = query
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        pairs.sort_unstable();

        if pairs.is_empty() {
            String::from(path)
        } else {
            format!("{path}?{}", pairs.join("&"))
        }
    }

    /// Returns the cached body for `key` if it has not expired.
    pub(crate) async fn get(&self, key: &str) -> Option<Arc<str>> {
        let entry = self.entries.get(key).await?;
        tracing::debug!(key = key, "response cache hit");
        Some(entry.body)
    }

    /// Returns the cached body for `key`, running `fetch` on a miss.
    ///
    /// The fetched body is stored for `ttl` only when `fetch` succeeds.
    /// A zero `ttl` bypasses the cache.
    pub(crate) async fn get_or_try_insert<F>(
        &self,
        key: String,
        ttl: Duration,
        fetch: F,
    ) -> Result<Arc<str>>
    where
        F: Future<Output = Result<String>>,
    {
        if ttl.is_zero() {
            return fetch.await.map(Arc::from);
        }

        let entry = self
            .entries
            .try_get_with(key, async {
                let body = fetch.await?;
                Ok::<_, anyhow::Error>(CachedBody {
                    body: Arc::from(body),
                    ttl,
                })
            })
            .await
            .map_err(|err| anyhow!("{err:#}"))?;
        Ok(entry.body)
    }

    /// Approximate number of stored entries.
    pub(crate) fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::bail;
    use tracing_mock::{expect, subscriber};

    use super::*;

    async fn counted_fetch(calls: &AtomicU32, body: &str) -> Result<String> {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(String::from(body))
    }

    #[test]
    fn test_cache_key_sorts_query() {
        // Arrange
        let query = [("page", String::from("2")), ("language", String::from("en-US"))];

        // Act
        let key = ResponseCache::cache_key("movie/popular", &query);

        // Assert
        assert_eq!(key, "movie/popular?language=en-US&page=2");
    }

    #[test]
    fn test_cache_key_without_query() {
        // Arrange & Act
        let key = ResponseCache::cache_key("configuration", &[]);

        // Assert
        assert_eq!(key, "configuration");
    }

    #[tokio::test]
    async fn test_get_returns_stored_body() {
        // Arrange
        let cache = ResponseCache::new();
        let calls = AtomicU32::new(0);
        cache
            .get_or_try_insert(String::from("k"), DEFAULT_TTL, counted_fetch(&calls, "body"))
            .await
            .unwrap();

        // Act
        let hit = cache.get("k").await;
        let again = cache
            .get_or_try_insert(String::from("k"), DEFAULT_TTL, counted_fetch(&calls, "other"))
            .await
            .unwrap();

        // Assert
        assert_eq!(hit.as_deref(), Some("body"));
        assert_eq!(&*again, "body");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_entries_expire_after_their_own_ttl() {
        // Arrange
        let cache = ResponseCache::new();
        let calls = AtomicU32::new(0);
        cache
            .get_or_try_insert(
                String::from("short"),
                Duration::from_millis(50),
                counted_fetch(&calls, "a"),
            )
            .await
            .unwrap();
        cache
            .get_or_try_insert(String::from("long"), DEFAULT_TTL, counted_fetch(&calls, "b"))
            .await
            .unwrap();

        // Act
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Assert
        assert!(cache.get("short").await.is_none());
        assert_eq!(cache.get("long").await.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_zero_ttl_is_not_stored() {
        // Arrange
        let cache = ResponseCache::new();
        let calls = AtomicU32::new(0);

        // Act
        for _ in 0..2 {
            cache
                .get_or_try_insert(String::from("k"), Duration::ZERO, counted_fetch(&calls, "x"))
                .await
                .unwrap();
        }

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_stored() {
        // Arrange
        let cache = ResponseCache::new();
        let calls = AtomicU32::new(0);

        // Act
        let failed = cache
            .get_or_try_insert(String::from("k"), DEFAULT_TTL, async {
                bail!("upstream down")
            })
            .await;
        let recovered = cache
            .get_or_try_insert(String::from("k"), DEFAULT_TTL, counted_fetch(&calls, "ok"))
            .await
            .unwrap();

        // Assert
        assert!(failed.unwrap_err().to_string().contains("upstream down"));
        assert_eq!(&*recovered, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        // Arrange
        let cache = ResponseCache::new();
        let calls = AtomicU32::new(0);

        // Act
        let (a, b) = tokio::join!(
            cache.get_or_try_insert(String::from("k"), DEFAULT_TTL, counted_fetch(&calls, "x")),
            cache.get_or_try_insert(String::from("k"), DEFAULT_TTL, counted_fetch(&calls, "x")),
        );

        // Assert
        assert_eq!(&*a.unwrap(), "x");
        assert_eq!(&*b.unwrap(), "x");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hit_is_logged() {
        // Arrange
        let cache = ResponseCache::new();
        let calls = AtomicU32::new(0);
        cache
            .get_or_try_insert(
                String::from("genre/movie/list"),
                DEFAULT_TTL,
                counted_fetch(&calls, "{}"),
            )
            .await
            .unwrap();

        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::DEBUG)
                    .with_fields(expect::msg("response cache hit")),
            )
            .only()
            .run_with_handle();

        // Act
        {
            let _guard = tracing::subscriber::set_default(subscriber);
            cache.get("genre/movie/list").await;
        }

        // Assert
        handle.assert_finished();
    }
}
