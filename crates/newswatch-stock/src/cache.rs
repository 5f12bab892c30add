//! Caching layer for news and price data to reduce API calls
//!
//! Two caches live here:
//! - [`ResponseCache`]: raw news responses as JSON files on disk, one file per
//!   (company, start, end) query, with an optional lifetime.
//! - [`MemoryCache`]: a timed in-process cache, used for price histories.

use crate::dates::format_date;
use crate::error::Result;
use cached::{Cached, TimedCache};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for in-memory lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Stock symbol
    pub symbol: String,
    /// API endpoint or operation type
    pub endpoint: String,
    /// Additional parameters as JSON string
    pub params: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(
        symbol: impl Into<String>,
        endpoint: impl Into<String>,
        params: impl Serialize,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: endpoint.into(),
            params: serde_json::to_string(&params).unwrap_or_default(),
        }
    }
}

/// Thread-safe timed cache
pub struct MemoryCache<V> {
    cache: Arc<RwLock<TimedCache<CacheKey, V>>>,
}

impl<V: Clone> MemoryCache<V> {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: V) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If the value exists in cache, it's returned immediately.
    /// Otherwise, the fetcher function is called and the result is cached.
    /// Errors are not cached.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: CacheKey,
        fetcher: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }
}

impl<V> Clone for MemoryCache<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

/// File name for a news query: the company with spaces and path separators
/// replaced by `_`, followed by whichever of the dates are present, joined
/// with `_`.
pub fn response_key(company: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    let mut parts = vec![company.replace([' ', '/', '\\'], "_")];
    parts.extend(start.map(format_date));
    parts.extend(end.map(format_date));
    format!("{}.json", parts.join("_"))
}

/// Read-through disk cache of raw JSON responses
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Option<Duration>,
}

impl ResponseCache {
    /// `ttl = None` keeps entries forever
    pub fn new(dir: impl Into<PathBuf>, ttl: Option<Duration>) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Stored document for `key`, or `None` when absent, expired or unreadable.
    ///
    /// Read failures are logged and treated as a miss.
    pub async fn load(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.path_for(key);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(_) => {
                tracing::debug!("Cache miss for {}", path.display());
                return None;
            }
        };

        if let Some(ttl) = self.ttl {
            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| modified.elapsed().ok())
                .unwrap_or_default();
            if age >= ttl {
                tracing::debug!(
                    "Cache entry {} expired ({}s old)",
                    path.display(),
                    age.as_secs()
                );
                return None;
            }
        }

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read cache file {}: {e}", path.display());
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                tracing::debug!("Cache hit for {}", path.display());
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache file {}: {e}", path.display());
                None
            }
        }
    }

    /// Write `value` under `key`, creating the directory if needed
    pub async fn store(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        tokio::fs::write(&path, serde_json::to_vec(value)?).await?;
        tracing::debug!("Stored response in {}", path.display());
        Ok(())
    }

    /// Remove the entry for `key` if present
    pub async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
