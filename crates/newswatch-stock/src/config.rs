//! Configuration for news and price lookups

use crate::dates::{RetentionWindow, DEFAULT_RETENTION_DAYS};
use crate::error::{Result, StockError};
use newswatch_core::PolarityThresholds;
use newswatch_utils::{EnvLookup, EnvReader};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Liquid tickers the hot-stocks dashboard ranks by default
pub const POPULAR_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "TSLA", "AMZN", "GOOGL", "META", "NVDA", "NFLX", "AMD", "INTC",
];

pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org";
pub const FINNHUB_BASE_URL: &str = "https://finnhub.io";

/// News provider that needs a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsProvider {
    /// Free-text search, used by `feed` and `track`
    NewsApi,
    /// Per-symbol company news, used by `hot`
    Finnhub,
}

/// Configuration shared by every pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// NewsAPI key (`NEWSAPI_API_KEY`)
    pub newsapi_key: Option<String>,

    /// Finnhub key (`FINNHUB_API_KEY`)
    pub finnhub_key: Option<String>,

    pub newsapi_base_url: String,

    pub finnhub_base_url: String,

    /// Article language filter
    pub language: String,

    /// Maximum articles per news request
    pub page_size: u32,

    /// Days of history the news provider serves
    pub retention_days: u32,

    /// Sentiment label boundaries
    pub thresholds: PolarityThresholds,

    /// Candidate tickers for the gainer ranking
    pub tickers: Vec<String>,

    /// Directory for cached news responses
    pub cache_dir: PathBuf,

    /// Lifetime of cached news responses; `None` never expires
    pub cache_ttl: Option<Duration>,

    /// Lifetime of in-memory price histories
    pub price_cache_ttl: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Finnhub requests per minute
    pub finnhub_rate_limit: u32,

    /// Calendar days of history fetched to find the last two closes
    pub gainer_lookback_days: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            newsapi_key: None,
            finnhub_key: None,
            newsapi_base_url: NEWSAPI_BASE_URL.to_string(),
            finnhub_base_url: FINNHUB_BASE_URL.to_string(),
            language: "en".to_string(),
            page_size: 20,
            retention_days: DEFAULT_RETENTION_DAYS,
            thresholds: PolarityThresholds::default(),
            tickers: POPULAR_TICKERS.iter().map(|s| (*s).to_string()).collect(),
            cache_dir: PathBuf::from("news_cache"),
            cache_ttl: Some(Duration::from_secs(6 * 3600)), // 6 hours
            price_cache_ttl: Duration::from_secs(3600),     // 1 hour
            request_timeout: Duration::from_secs(10),
            finnhub_rate_limit: 60,
            gainer_lookback_days: 7,
        }
    }
}

impl FeedConfig {
    /// Create a new configuration builder
    pub fn builder() -> FeedConfigBuilder {
        FeedConfigBuilder::default()
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    pub fn retention(&self) -> RetentionWindow {
        RetentionWindow::new(self.retention_days)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.page_size) {
            return Err(StockError::ConfigError(format!(
                "page_size must be between 1 and 100, got {}",
                self.page_size
            )));
        }

        if self.retention_days == 0 {
            return Err(StockError::ConfigError(
                "retention_days must be greater than 0".to_string(),
            ));
        }

        if self.thresholds.negative > self.thresholds.positive {
            return Err(StockError::ConfigError(
                "negative threshold must not exceed positive threshold".to_string(),
            ));
        }

        if self.finnhub_rate_limit == 0 {
            return Err(StockError::ConfigError(
                "finnhub_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.gainer_lookback_days < 2 {
            return Err(StockError::ConfigError(
                "gainer_lookback_days must be at least 2".to_string(),
            ));
        }

        Ok(())
    }

    /// Key for `provider`, or a configuration error naming the variable to set
    pub fn require_key(&self, provider: NewsProvider) -> Result<&str> {
        let (key, var) = match provider {
            NewsProvider::NewsApi => (&self.newsapi_key, "NEWSAPI_API_KEY"),
            NewsProvider::Finnhub => (&self.finnhub_key, "FINNHUB_API_KEY"),
        };
        key.as_deref().ok_or_else(|| {
            StockError::ConfigError(format!("{var} environment variable not set"))
        })
    }
}

/// Builder for FeedConfig
#[derive(Debug, Default)]
pub struct FeedConfigBuilder {
    newsapi_key: Option<String>,
    finnhub_key: Option<String>,
    newsapi_base_url: Option<String>,
    finnhub_base_url: Option<String>,
    language: Option<String>,
    page_size: Option<u32>,
    retention_days: Option<u32>,
    thresholds: Option<PolarityThresholds>,
    tickers: Option<Vec<String>>,
    cache_dir: Option<PathBuf>,
    cache_ttl: Option<Option<Duration>>,
    price_cache_ttl: Option<Duration>,
    request_timeout: Option<Duration>,
    finnhub_rate_limit: Option<u32>,
    gainer_lookback_days: Option<u32>,
}

impl FeedConfigBuilder {
    pub fn newsapi_key(mut self, key: impl Into<String>) -> Self {
        self.newsapi_key = Some(key.into());
        self
    }

    pub fn finnhub_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_key = Some(key.into());
        self
    }

    pub fn newsapi_base_url(mut self, url: impl Into<String>) -> Self {
        self.newsapi_base_url = Some(url.into());
        self
    }

    pub fn finnhub_base_url(mut self, url: impl Into<String>) -> Self {
        self.finnhub_base_url = Some(url.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn retention_days(mut self, days: u32) -> Self {
        self.retention_days = Some(days);
        self
    }

    pub fn thresholds(mut self, thresholds: PolarityThresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tickers = Some(tickers.into_iter().map(Into::into).collect());
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// `None` keeps cached responses forever
    pub fn cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn price_cache_ttl(mut self, ttl: Duration) -> Self {
        self.price_cache_ttl = Some(ttl);
        self
    }

    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    pub fn finnhub_rate_limit(mut self, per_minute: u32) -> Self {
        self.finnhub_rate_limit = Some(per_minute);
        self
    }

    pub fn gainer_lookback_days(mut self, days: u32) -> Self {
        self.gainer_lookback_days = Some(days);
        self
    }

    /// Load keys and overrides from the process environment
    pub fn with_env(self) -> Result<Self> {
        self.with_env_from(&EnvReader::process())
    }

    /// Load keys and overrides from `env`; values already set on the builder win
    pub fn with_env_from<L: EnvLookup>(mut self, env: &EnvReader<L>) -> Result<Self> {
        if self.newsapi_key.is_none() {
            self.newsapi_key = env.string("NEWSAPI_API_KEY");
        }
        if self.finnhub_key.is_none() {
            self.finnhub_key = env.string("FINNHUB_API_KEY");
        }
        if self.language.is_none() {
            self.language = env.string("NEWSWATCH_LANGUAGE");
        }
        if self.cache_dir.is_none() {
            self.cache_dir = env.string("NEWSWATCH_CACHE_DIR").map(PathBuf::from);
        }
        if self.cache_ttl.is_none() {
            if let Some(secs) = env.parse::<u64>("NEWSWATCH_CACHE_TTL_SECS")? {
                self.cache_ttl = Some((secs > 0).then(|| Duration::from_secs(secs)));
            }
        }
        if self.tickers.is_none() {
            self.tickers = env.list("NEWSWATCH_TICKERS");
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<FeedConfig> {
        let defaults = FeedConfig::default();

        let config = FeedConfig {
            newsapi_key: self.newsapi_key,
            finnhub_key: self.finnhub_key,
            newsapi_base_url: self.newsapi_base_url.unwrap_or(defaults.newsapi_base_url),
            finnhub_base_url: self.finnhub_base_url.unwrap_or(defaults.finnhub_base_url),
            language: self.language.unwrap_or(defaults.language),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            retention_days: self.retention_days.unwrap_or(defaults.retention_days),
            thresholds: self.thresholds.unwrap_or(defaults.thresholds),
            tickers: self
                .tickers
                .map(|t| t.into_iter().map(|s| s.trim().to_uppercase()).collect())
                .unwrap_or(defaults.tickers),
            cache_dir: self.cache_dir.unwrap_or(defaults.cache_dir),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            price_cache_ttl: self.price_cache_ttl.unwrap_or(defaults.price_cache_ttl),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            finnhub_rate_limit: self.finnhub_rate_limit.unwrap_or(defaults.finnhub_rate_limit),
            gainer_lookback_days: self
                .gainer_lookback_days
                .unwrap_or(defaults.gainer_lookback_days),
        };

        config.validate()?;
        Ok(config)
    }
}
