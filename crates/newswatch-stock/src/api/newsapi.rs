//! NewsAPI client (`/v2/everything`) with optional disk caching

use crate::cache::{response_key, ResponseCache};
use crate::config::{FeedConfig, NewsProvider};
use crate::dates::format_date;
use crate::error::{Result, StockError};
use crate::source::{NewsQuery, NewsSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newswatch_core::NewsItem;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Publisher reference inside an article
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Article as returned by NewsAPI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiArticle {
    #[serde(default)]
    pub source: ArticleSource,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
}

impl NewsApiArticle {
    /// Convert to a [`NewsItem`]; articles without a parseable publish time are dropped
    pub fn into_news_item(self) -> Option<NewsItem> {
        let published_at = self
            .published_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))?;

        let mut item = NewsItem::new(
            published_at,
            self.title.unwrap_or_default(),
            self.source.name.unwrap_or_else(|| "Unknown".to_string()),
            self.url.unwrap_or_default(),
        );
        item.description = self.description.filter(|d| !d.is_empty());
        Some(item)
    }
}

/// Body of an `/v2/everything` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: String,
    pub message: Option<String>,
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
}

impl NewsApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// NewsAPI client
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    cache: Option<ResponseCache>,
}

impl NewsApiClient {
    /// Create a client against `base_url` (e.g. `https://newsapi.org`)
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            cache: None,
        }
    }

    /// Create from configuration; requires `newsapi_key`
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let api_key = config.require_key(NewsProvider::NewsApi)?;
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.newsapi_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            cache: None,
        })
    }

    /// Serve repeated queries from `cache`
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn params(&self, query: &NewsQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", query.query.clone()),
            ("sortBy", "publishedAt".to_string()),
            ("language", query.language.clone()),
            ("pageSize", query.page_size.to_string()),
            ("apiKey", self.api_key.clone()),
        ];
        if let Some(start) = query.range.start {
            params.push(("from", format_date(start)));
        }
        if let Some(end) = query.range.end {
            params.push(("to", format_date(end)));
        }
        params
    }

    async fn request(&self, query: &NewsQuery) -> Result<serde_json::Value> {
        let url = format!("{}/v2/everything", self.base_url);
        tracing::debug!("Requesting news for '{}' from NewsAPI", query.query);

        let response = self
            .client
            .get(&url)
            .query(&self.params(query))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Error bodies carry {"status": "error", "message": ...}
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(StockError::ApiError(format!(
                "NewsAPI error {status}: {body}"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn cache_key(query: &NewsQuery) -> String {
        response_key(&query.query, query.range.start, query.range.end)
    }

    /// Drop the cached response for `query` so the next search goes to NewsAPI
    pub async fn forget(&self, query: &NewsQuery) -> Result<()> {
        if let Some(cache) = &self.cache {
            cache.remove(&Self::cache_key(query)).await?;
            tracing::info!("Cleared cached news for {}", query.query);
        }
        Ok(())
    }

    /// Run an `/v2/everything` search, reading from and filling the cache
    pub async fn everything(&self, query: &NewsQuery) -> Result<NewsApiResponse> {
        let key = Self::cache_key(query);

        if let Some(cache) = &self.cache {
            if let Some(value) = cache.load(&key).await {
                match serde_json::from_value::<NewsApiResponse>(value) {
                    Ok(response) => {
                        tracing::info!("Using cached data for {}", query.query);
                        return Ok(response);
                    }
                    Err(e) => tracing::warn!("Ignoring unreadable cache entry {key}: {e}"),
                }
            }
        }

        let value = self.request(query).await?;
        let response: NewsApiResponse = serde_json::from_value(value.clone())?;

        if !response.is_ok() {
            return Err(StockError::NewsApi {
                message: response
                    .message
                    .unwrap_or_else(|| format!("status '{}'", response.status)),
            });
        }

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(&key, &value).await {
                tracing::warn!("Failed to cache news response: {e}");
            }
        }

        Ok(response)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>> {
        let response = self.everything(query).await?;
        let total = response.articles.len();

        let items: Vec<NewsItem> = response
            .articles
            .into_iter()
            .filter_map(NewsApiArticle::into_news_item)
            .collect();

        if items.len() < total {
            tracing::warn!(
                "Dropped {} articles without a valid publish time",
                total - items.len()
            );
        }
        Ok(items)
    }
}
