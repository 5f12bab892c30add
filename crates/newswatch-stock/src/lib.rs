//! News and price providers for newswatch
//!
//! This crate connects the pure pipeline in `newswatch-core` to the outside
//! world. It includes:
//!
//! - NewsAPI and Finnhub news clients, Yahoo Finance daily prices
//! - A disk cache for raw news responses and an in-memory price cache
//! - Date validation against the news provider's retention window
//! - The `feed`/`track` sentiment tracker and the hot-stocks dashboard
//! - Terminal table rendering of the resulting reports
//!
//! # Example
//!
//! ```rust,ignore
//! use newswatch_stock::{
//!     api::{NewsApiClient, YahooFinanceClient},
//!     dates::{today, DateRange},
//!     report, FeedConfig, SentimentTracker,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(FeedConfig::from_env()?);
//!     let news = Arc::new(NewsApiClient::from_config(&config)?);
//!     let tracker = SentimentTracker::new(news, Arc::new(YahooFinanceClient::new()), config);
//!
//!     let range = DateRange::last_days(7, today());
//!     let news_report = tracker.news_report("Tesla", range).await;
//!     let alignment = tracker.align_prices("TSLA", &news_report).await;
//!     println!("{}", report::render_alignment(&alignment));
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod report;
pub mod source;
pub mod tracker;

// Re-export main types for convenience
pub use cache::{CacheKey, MemoryCache, ResponseCache};
pub use config::{FeedConfig, FeedConfigBuilder, NewsProvider, POPULAR_TICKERS};
pub use dashboard::{DashboardOptions, DashboardReport, HotStocks};
pub use dates::{DateRange, RetentionWindow};
pub use error::{Result, StockError};
pub use source::{CachedPriceSource, NewsQuery, NewsSource, PriceSource};
pub use tracker::{NewsReport, PriceAlignment, SentimentTracker};
