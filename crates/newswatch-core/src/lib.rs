//! Core sentiment pipeline for newswatch
//!
//! This crate holds the provider-independent part of newswatch: it turns a list
//! of news items and a list of daily price bars into date-bucketed sentiment
//! counts aligned with closing prices. It includes:
//!
//! - Polarity scoring (`VaderScorer`, `LexiconScorer`) and threshold classification
//! - Per-date aggregation into a `DailySentimentBucket`
//! - Inner-join alignment of sentiment buckets with price bars
//! - Top-gainer ranking by day-over-day percent change
//! - Pearson correlation of daily returns across tickers
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use newswatch_core::{
//!     align, DailySentimentBucket, LexiconScorer, NewsItem, PriceBar, SentimentClassifier,
//! };
//!
//! let classifier = SentimentClassifier::new(LexiconScorer::default());
//! let published = Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap();
//! let items = vec![
//!     NewsItem::new(published, "Shares surge on record profit", "Wire", "https://example.com/a"),
//!     NewsItem::new(published, "Regulator opens fraud probe", "Wire", "https://example.com/b"),
//! ];
//!
//! let classified = classifier.classify_all(items);
//! let bucket = DailySentimentBucket::from_items(&classified);
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let series = align(&bucket, &[PriceBar::new(day, 150.0)]);
//! assert_eq!(series.len(), 1);
//! assert_eq!(series.rows()[0].positive, 1);
//! assert_eq!(series.rows()[0].negative, 1);
//! ```

pub mod aggregate;
pub mod align;
pub mod correlation;
pub mod error;
pub mod model;
pub mod polarity;
pub mod rank;

pub use aggregate::DailySentimentBucket;
pub use align::{align, AlignedRow, AlignedSeries};
pub use correlation::{correlate, daily_returns, CorrelationMatrix};
pub use error::{CoreError, Result};
pub use model::{ClassifiedItem, NewsItem, PriceBar, SentimentCounts, SentimentLabel};
pub use polarity::{
    LexiconScorer, PolarityScorer, PolarityThresholds, SentimentClassifier, VaderScorer,
};
pub use rank::{rank_gainers, Gainer};
