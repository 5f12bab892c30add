//! Finnhub company-news client

use crate::config::{FeedConfig, NewsProvider};
use crate::dates::{format_date, today};
use crate::error::{Result, StockError};
use crate::source::{NewsQuery, NewsSource};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use newswatch_core::NewsItem;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Days searched when a query has no start date
const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Finnhub news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinnhubNewsArticle {
    /// Article category
    #[serde(default)]
    pub category: String,
    /// Publish time (UNIX timestamp)
    pub datetime: i64,
    /// News headline
    #[serde(default)]
    pub headline: String,
    /// Unique article ID
    #[serde(default)]
    pub id: i64,
    /// Related symbols
    #[serde(default)]
    pub related: String,
    /// News source
    #[serde(default)]
    pub source: String,
    /// Article summary
    #[serde(default)]
    pub summary: String,
    /// Article URL
    #[serde(default)]
    pub url: String,
}

impl FinnhubNewsArticle {
    pub fn into_news_item(self) -> Option<NewsItem> {
        let published_at = DateTime::from_timestamp(self.datetime, 0)?;
        let mut item = NewsItem::new(published_at, self.headline, self.source, self.url);
        item.description = Some(self.summary).filter(|s| !s.is_empty());
        Some(item)
    }
}

/// Finnhub client for news API
#[derive(Clone)]
pub struct FinnhubClient {
    client: Client,
    base_url: String,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl FinnhubClient {
    /// Create a new Finnhub client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - Finnhub API key
    /// * `base_url` - API root, e.g. `https://finnhub.io`
    /// * `rate_limit` - Requests per minute (free tier: 60, premium: 300+)
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, rate_limit: u32) -> Self {
        Self::with_client(Client::new(), api_key, base_url, rate_limit)
    }

    fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        rate_limit: u32,
    ) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            rate_limiter,
        }
    }

    /// Create from configuration; requires `finnhub_key`
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let api_key = config.require_key(NewsProvider::Finnhub)?;
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(
            client,
            api_key,
            config.finnhub_base_url.as_str(),
            config.finnhub_rate_limit,
        ))
    }

    /// Get company news for a specific symbol
    ///
    /// # Arguments
    /// * `symbol` - Stock symbol (e.g., "AAPL")
    /// * `from` - Start date
    /// * `to` - End date
    pub async fn get_company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinnhubNewsArticle>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/api/v1/company-news", self.base_url);
        tracing::debug!("Requesting Finnhub news for {symbol}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.to_string()),
                ("from", format_date(from)),
                ("to", format_date(to)),
                ("token", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| StockError::ApiError(format!("Finnhub request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StockError::ApiError(format!(
                "Finnhub API error {status}: {body}"
            )));
        }

        response
            .json::<Vec<FinnhubNewsArticle>>()
            .await
            .map_err(|e| StockError::ApiError(format!("Failed to parse Finnhub response: {e}")))
    }
}

impl std::fmt::Debug for FinnhubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinnhubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NewsSource for FinnhubClient {
    async fn fetch_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>> {
        let (from, to) = query.range.resolve(today(), DEFAULT_LOOKBACK_DAYS);
        let articles = self.get_company_news(&query.query, from, to).await?;

        Ok(articles
            .into_iter()
            .filter_map(FinnhubNewsArticle::into_news_item)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DateRange;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_finnhub_client_creation() {
        let client = FinnhubClient::new("test_key", "https://finnhub.io/", 60);
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.base_url, "https://finnhub.io");
    }

    #[test]
    fn test_article_conversion() {
        let article: FinnhubNewsArticle = serde_json::from_value(json!({
            "datetime": 1_704_205_800,
            "headline": "Apple beats estimates",
            "source": "Yahoo",
            "url": "https://example.com/a",
            "summary": ""
        }))
        .unwrap();

        let item = article.into_news_item().unwrap();
        assert_eq!(item.headline, "Apple beats estimates");
        assert_eq!(item.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(item.description.is_none());
    }

    #[tokio::test]
    async fn test_fetch_news() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/company-news")
                    .query_param("symbol", "AAPL")
                    .query_param("from", "2024-01-01")
                    .query_param("to", "2024-01-05")
                    .query_param("token", "test_key");
                then.status(200).json_body(json!([
                    {
                        "category": "company",
                        "datetime": 1_704_205_800,
                        "headline": "Apple beats estimates",
                        "id": 1,
                        "image": "",
                        "related": "AAPL",
                        "source": "Yahoo",
                        "summary": "Quarterly results",
                        "url": "https://example.com/a"
                    }
                ]));
            })
            .await;

        let client = FinnhubClient::new("test_key", server.base_url(), 60);
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 5),
        )
        .unwrap();
        let items = client
            .fetch_news(&NewsQuery::new("AAPL", range))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description.as_deref(), Some("Quarterly results"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/company-news");
                then.status(403).body("forbidden");
            })
            .await;

        let client = FinnhubClient::new("bad", server.base_url(), 60);
        let err = client
            .get_company_news(
                "AAPL",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("403"));
    }
}
