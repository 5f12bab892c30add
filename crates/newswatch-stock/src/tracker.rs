//! Company news sentiment and its alignment with the stock price
//!
//! Backs the `feed` and `track` commands. Provider failures never escape as
//! errors: they are logged, recorded as a warning on the report and the
//! report comes back empty, which callers display as "no data".

use crate::config::FeedConfig;
use crate::dates::{today, DateRange};
use crate::source::{NewsQuery, NewsSource, PriceSource};
use chrono::{Duration, NaiveDate};
use newswatch_core::{
    align, AlignedSeries, ClassifiedItem, DailySentimentBucket, NewsItem, PriceBar,
    SentimentClassifier, SentimentCounts,
};
use serde::Serialize;
use std::sync::Arc;

/// Classified news for one company over a date range
#[derive(Debug, Clone, Serialize)]
pub struct NewsReport {
    pub company: String,
    pub range: DateRange,
    pub articles: Vec<ClassifiedItem>,
    pub by_date: DailySentimentBucket,
    pub totals: SentimentCounts,
    pub warnings: Vec<String>,
}

impl NewsReport {
    pub fn empty(company: impl Into<String>, range: DateRange) -> Self {
        Self {
            company: company.into(),
            range,
            articles: Vec::new(),
            by_date: DailySentimentBucket::new(),
            totals: SentimentCounts::default(),
            warnings: Vec::new(),
        }
    }

    /// Classify `items` and bucket them by day
    pub fn build(
        company: impl Into<String>,
        range: DateRange,
        classifier: &SentimentClassifier,
        items: Vec<NewsItem>,
    ) -> Self {
        let articles = classifier.classify_all(items);
        let by_date = DailySentimentBucket::from_items(&articles);
        let totals = by_date.totals();

        Self {
            company: company.into(),
            range,
            articles,
            by_date,
            totals,
            warnings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// A price history joined with a news report
#[derive(Debug, Clone, Serialize)]
pub struct PriceAlignment {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
    pub series: AlignedSeries,
    pub warnings: Vec<String>,
}

impl PriceAlignment {
    /// Nothing to show: no prices, or no date shared with the news
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// News sentiment tracker for a single company
pub struct SentimentTracker {
    news: Arc<dyn NewsSource>,
    prices: Arc<dyn PriceSource>,
    classifier: SentimentClassifier,
    config: Arc<FeedConfig>,
}

impl SentimentTracker {
    /// Tracker scoring headlines with VADER and the configured thresholds
    pub fn new(
        news: Arc<dyn NewsSource>,
        prices: Arc<dyn PriceSource>,
        config: Arc<FeedConfig>,
    ) -> Self {
        let classifier = SentimentClassifier::vader().with_thresholds(config.thresholds);
        Self {
            news,
            prices,
            classifier,
            config,
        }
    }

    /// Replace the classifier
    pub fn with_classifier(mut self, classifier: SentimentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// Fetch and classify news about `company`
    pub async fn news_report(&self, company: &str, range: DateRange) -> NewsReport {
        let query = NewsQuery::new(company, range)
            .with_language(self.config.language.as_str())
            .with_page_size(self.config.page_size);

        match self.news.fetch_news(&query).await {
            Ok(items) => {
                tracing::info!("Fetched {} articles for {company}", items.len());
                let report = NewsReport::build(company, range, &self.classifier, items);
                if report.is_empty() {
                    tracing::info!("No news found for {company} in given date range");
                }
                report
            }
            Err(e) => {
                tracing::warn!("News lookup for {company} failed: {e}");
                let mut report = NewsReport::empty(company, range);
                report.warnings.push(e.to_string());
                report
            }
        }
    }

    /// Price window covering the report: explicit bounds first, then the
    /// span of the news itself, then the last week
    fn price_window(&self, report: &NewsReport) -> (NaiveDate, NaiveDate) {
        let now = today();
        let end = report
            .range
            .end
            .or_else(|| report.by_date.last_date())
            .unwrap_or(now);
        let start = report
            .range
            .start
            .or_else(|| report.by_date.first_date())
            .unwrap_or_else(|| end - Duration::days(7));
        (start.min(end), end)
    }

    /// Fetch `ticker` prices over the report's window and join them with the news
    pub async fn align_prices(&self, ticker: &str, report: &NewsReport) -> PriceAlignment {
        let (start, end) = self.price_window(report);
        let mut warnings = Vec::new();

        let bars = match self.prices.daily_bars(ticker, start, end).await {
            Ok(bars) if !bars.is_empty() => bars,
            Ok(_) => {
                tracing::warn!("Empty price history for {ticker}");
                warnings.push("Could not fetch price data. Check the ticker symbol.".to_string());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Price lookup for {ticker} failed: {e}");
                warnings.push("Could not fetch price data. Check the ticker symbol.".to_string());
                Vec::new()
            }
        };

        let series = align(&report.by_date, &bars);
        if series.is_empty() && !bars.is_empty() {
            warnings.push("No matching dates between stock data and news.".to_string());
        }

        PriceAlignment {
            ticker: ticker.to_string(),
            bars,
            series,
            warnings,
        }
    }
}
