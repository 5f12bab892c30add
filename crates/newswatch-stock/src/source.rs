//! Provider seams: where news items and price bars come from
//!
//! Pipelines hold `Arc<dyn NewsSource>` / `Arc<dyn PriceSource>` so the HTTP
//! clients can be swapped for mocks in tests.

use crate::cache::{CacheKey, MemoryCache};
use crate::dates::{format_date, DateRange};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use newswatch_core::{NewsItem, PriceBar};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// A news search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    /// Free-text company name, or a ticker for per-symbol providers
    pub query: String,
    pub range: DateRange,
    pub language: String,
    /// Maximum number of articles
    pub page_size: u32,
}

impl NewsQuery {
    pub fn new(query: impl Into<String>, range: DateRange) -> Self {
        Self {
            query: query.into(),
            range,
            language: "en".to_string(),
            page_size: 20,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Trait for news providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Articles matching `query`, newest first as the provider returns them
    async fn fetch_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>>;
}

/// Trait for daily price history providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Daily bars for `symbol` from `start` to `end`, both inclusive
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>>;
}

/// Price source that remembers histories for a while
pub struct CachedPriceSource {
    inner: Arc<dyn PriceSource>,
    cache: MemoryCache<Vec<PriceBar>>,
}

impl CachedPriceSource {
    pub fn new(inner: Arc<dyn PriceSource>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: MemoryCache::new(ttl),
        }
    }
}

#[async_trait]
impl PriceSource for CachedPriceSource {
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let key = CacheKey::new(
            symbol,
            "daily_bars",
            json!({ "start": format_date(start), "end": format_date(end) }),
        );

        self.cache
            .get_or_fetch(key, || self.inner.daily_bars(symbol, start, end))
            .await
    }
}
