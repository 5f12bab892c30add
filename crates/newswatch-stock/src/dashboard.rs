//! Daily hot-stocks dashboard
//!
//! Ranks a ticker list by the latest day-over-day move, attaches a few
//! classified headlines and the closing prices to each gainer, and correlates
//! the returns of a chosen subset of gainers.

use crate::config::FeedConfig;
use crate::dates::DateRange;
use crate::error::Result;
use crate::source::{NewsQuery, NewsSource, PriceSource};
use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use newswatch_core::{
    correlate, rank_gainers, ClassifiedItem, CorrelationMatrix, Gainer, PriceBar,
    SentimentClassifier,
};
use serde::Serialize;
use std::sync::Arc;

/// Headlines shown per gainer unless configured otherwise
pub const DEFAULT_NEWS_LIMIT: usize = 5;

/// Time frames offered for headlines and price history
pub const TIME_FRAMES: [u32; 3] = [7, 14, 30];

/// Inputs of one dashboard run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardOptions {
    /// Days of headlines and price history per gainer
    pub days: u32,
    /// Tickers to rank
    pub tickers: Vec<String>,
    /// Gainers whose returns are correlated
    pub compare: Vec<String>,
    /// Headlines per gainer
    pub news_limit: usize,
    pub today: NaiveDate,
}

impl DashboardOptions {
    pub fn new(tickers: Vec<String>, today: NaiveDate) -> Self {
        Self {
            days: 14,
            tickers,
            compare: Vec::new(),
            news_limit: DEFAULT_NEWS_LIMIT,
            today,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn with_compare(mut self, compare: Vec<String>) -> Self {
        self.compare = compare;
        self
    }

    pub fn with_news_limit(mut self, news_limit: usize) -> Self {
        self.news_limit = news_limit;
        self
    }

    pub fn range(&self) -> DateRange {
        DateRange::last_days(self.days, self.today)
    }
}

/// One ranked ticker with its headlines and prices
#[derive(Debug, Clone, Serialize)]
pub struct GainerSection {
    pub gainer: Gainer,
    pub headlines: Vec<ClassifiedItem>,
    pub prices: Vec<PriceBar>,
}

/// Correlation of the selected gainers plus the prices it was computed from
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub matrix: CorrelationMatrix,
    pub prices: Vec<(String, Vec<PriceBar>)>,
}

/// Everything the `hot` command renders
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub range: DateRange,
    pub sections: Vec<GainerSection>,
    pub comparison: Option<Comparison>,
    pub warnings: Vec<String>,
}

impl DashboardReport {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Hot-stocks dashboard pipeline
pub struct HotStocks {
    news: Arc<dyn NewsSource>,
    prices: Arc<dyn PriceSource>,
    classifier: SentimentClassifier,
    config: Arc<FeedConfig>,
}

impl HotStocks {
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

    pub fn with_classifier(mut self, classifier: SentimentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Fetch several histories concurrently, in input order.
    ///
    /// Failed or empty lookups are logged and left out.
    async fn fetch_histories(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<(String, Vec<PriceBar>)> {
        let fetches = symbols
            .iter()
            .map(|symbol| self.prices.daily_bars(symbol, start, end));
        let results = join_all(fetches).await;

        symbols
            .iter()
            .zip(results)
            .filter_map(|(symbol, result)| match result {
                Ok(bars) if !bars.is_empty() => Some((symbol.clone(), bars)),
                Ok(_) => {
                    tracing::warn!("No price data for {symbol}");
                    None
                }
                Err(e) => {
                    tracing::warn!("Skipping {symbol}: {e}");
                    None
                }
            })
            .collect()
    }

    /// Rank `tickers` by their most recent percent change, highest first
    pub async fn top_gainers(&self, tickers: &[String], today: NaiveDate) -> Vec<Gainer> {
        let start = today - Duration::days(i64::from(self.config.gainer_lookback_days));
        let histories = self.fetch_histories(tickers, start, today).await;
        let gainers = rank_gainers(histories);
        tracing::info!("Top gainers found: {}", gainers.len());
        gainers
    }

    /// Up to `limit` classified headlines about `symbol`
    pub async fn headlines(
        &self,
        symbol: &str,
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<ClassifiedItem>> {
        let query = NewsQuery::new(symbol, range).with_language(self.config.language.as_str());
        let items = self.news.fetch_news(&query).await?;
        Ok(self.classifier.classify_all(items.into_iter().take(limit)))
    }

    /// Run the whole dashboard
    pub async fn build(&self, options: &DashboardOptions) -> DashboardReport {
        let range = options.range();
        let mut warnings = Vec::new();

        let gainers = self.top_gainers(&options.tickers, options.today).await;
        if gainers.is_empty() {
            warnings.push("No gainers found! Try again later.".to_string());
        }

        let (start, end) = range.resolve(options.today, options.days);
        let mut sections = Vec::with_capacity(gainers.len());
        for gainer in gainers {
            let headlines = match self
                .headlines(&gainer.symbol, range, options.news_limit)
                .await
            {
                Ok(headlines) => headlines,
                Err(e) => {
                    tracing::warn!("News lookup for {} failed: {e}", gainer.symbol);
                    Vec::new()
                }
            };

            let prices = match self.prices.daily_bars(&gainer.symbol, start, end).await {
                Ok(prices) => prices,
                Err(e) => {
                    tracing::warn!("Price lookup for {} failed: {e}", gainer.symbol);
                    Vec::new()
                }
            };

            sections.push(GainerSection {
                gainer,
                headlines,
                prices,
            });
        }

        let mut selected = Vec::new();
        for symbol in &options.compare {
            let symbol = symbol.to_uppercase();
            if sections.iter().any(|s| s.gainer.symbol == symbol) {
                if !selected.contains(&symbol) {
                    selected.push(symbol);
                }
            } else {
                warnings.push(format!(
                    "{symbol} is not among the gainers; left out of the comparison."
                ));
            }
        }

        let comparison = if selected.is_empty() {
            None
        } else {
            let prices: Vec<(String, Vec<PriceBar>)> = selected
                .iter()
                .filter_map(|symbol| {
                    sections
                        .iter()
                        .find(|s| &s.gainer.symbol == symbol)
                        .filter(|s| !s.prices.is_empty())
                        .map(|s| (symbol.clone(), s.prices.clone()))
                })
                .collect();

            match correlate(prices.iter().map(|(s, bars)| (s.as_str(), bars.as_slice()))) {
                Ok(matrix) => Some(Comparison { matrix, prices }),
                Err(e) => {
                    tracing::warn!("Correlation skipped: {e}");
                    warnings
                        .push("Need at least two stocks with data for correlation.".to_string());
                    None
                }
            }
        };

        DashboardReport {
            range,
            sections,
            comparison,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StockError;
    use crate::source::{MockNewsSource, MockPriceSource};
    use chrono::{TimeZone, Utc};
    use newswatch_core::{NewsItem, SentimentLabel};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn history(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| PriceBar::new(date(2 + i as u32), *close))
            .collect()
    }

    fn closes_for(symbol: &str) -> Result<Vec<PriceBar>> {
        match symbol {
            "AAA" => Ok(history(&[100.0, 102.0, 101.0, 110.0])),
            "BBB" => Ok(history(&[50.0, 49.0, 51.0, 45.0])),
            "CCC" => Ok(history(&[10.0, 10.5, 10.2, 10.4])),
            "ONE" => Ok(history(&[5.0])),
            _ => Err(StockError::YahooFinanceError(format!("No price data for {symbol}"))),
        }
    }

    fn price_mock() -> MockPriceSource {
        let mut prices = MockPriceSource::new();
        prices
            .expect_daily_bars()
            .returning(|symbol, _, _| closes_for(symbol));
        prices
    }

    fn news_mock() -> MockNewsSource {
        let mut news = MockNewsSource::new();
        news.expect_fetch_news().returning(|query| {
            let published = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap();
            Ok((0..8)
                .map(|i| {
                    let headline = if i % 2 == 0 { "up" } else { "flat" };
                    NewsItem::new(
                        published,
                        format!("{} {headline}", query.query),
                        "Wire",
                        "https://example.com",
                    )
                })
                .collect())
        });
        news
    }

    fn scores(text: &str) -> f64 {
        if text.ends_with("up") {
            0.5
        } else {
            0.0
        }
    }

    fn dashboard(news: MockNewsSource, prices: MockPriceSource) -> HotStocks {
        HotStocks::new(Arc::new(news), Arc::new(prices), Arc::new(FeedConfig::default()))
            .with_classifier(SentimentClassifier::new(scores))
    }

    fn tickers(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn test_top_gainers_skips_failures() {
        let hot = dashboard(MockNewsSource::new(), price_mock());
        let gainers = hot
            .top_gainers(&tickers(&["BBB", "NOPE", "ONE", "CCC", "AAA"]), date(5))
            .await;

        let symbols: Vec<_> = gainers.iter().map(|g| g.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "CCC", "BBB"]);
        assert!(gainers.windows(2).all(|w| w[0].change_pct >= w[1].change_pct));
    }

    #[tokio::test]
    async fn test_headlines_are_limited_and_classified() {
        let hot = dashboard(news_mock(), MockPriceSource::new());
        let headlines = hot
            .headlines("AAA", DateRange::last_days(7, date(8)), 5)
            .await
            .unwrap();

        assert_eq!(headlines.len(), 5);
        assert_eq!(headlines[0].label, SentimentLabel::Positive);
        assert_eq!(headlines[1].label, SentimentLabel::Neutral);
    }

    #[tokio::test]
    async fn test_build_dashboard_with_comparison() {
        let hot = dashboard(news_mock(), price_mock());
        let options = DashboardOptions::new(tickers(&["AAA", "BBB", "CCC"]), date(5))
            .with_days(7)
            .with_compare(tickers(&["aaa", "CCC", "ZZZ"]))
            .with_news_limit(3);

        let report = hot.build(&options).await;

        assert_eq!(report.sections.len(), 3);
        assert_eq!(report.sections[0].gainer.symbol, "AAA");
        assert!(report.sections.iter().all(|s| s.headlines.len() == 3));
        assert!(report.sections.iter().all(|s| s.prices.len() == 4));

        let comparison = report.comparison.unwrap();
        assert_eq!(comparison.matrix.symbols, vec!["AAA", "CCC"]);
        assert_eq!(comparison.matrix.get("AAA", "AAA"), Some(1.0));
        assert_eq!(
            comparison.matrix.get("AAA", "CCC"),
            comparison.matrix.get("CCC", "AAA")
        );
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("ZZZ"));
    }

    #[tokio::test]
    async fn test_single_comparison_symbol_warns() {
        let hot = dashboard(news_mock(), price_mock());
        let options = DashboardOptions::new(tickers(&["AAA", "BBB"]), date(5))
            .with_compare(tickers(&["AAA"]));

        let report = hot.build(&options).await;

        assert!(report.comparison.is_none());
        assert_eq!(
            report.warnings,
            vec!["Need at least two stocks with data for correlation."]
        );
    }

    #[tokio::test]
    async fn test_comparison_drops_gainers_without_range_prices() {
        // BBB ranks fine on the short lookback but has nothing over the 14-day range
        let mut prices = MockPriceSource::new();
        prices
            .expect_daily_bars()
            .returning(|symbol, start, _| match symbol {
                "BBB" if start < date(5) - Duration::days(7) => Ok(Vec::new()),
                other => closes_for(other),
            });
        let hot = dashboard(news_mock(), prices);
        let options = DashboardOptions::new(tickers(&["AAA", "BBB", "CCC"]), date(5))
            .with_compare(tickers(&["AAA", "BBB", "CCC"]));

        let report = hot.build(&options).await;

        let bbb = report
            .sections
            .iter()
            .find(|s| s.gainer.symbol == "BBB")
            .unwrap();
        assert!(bbb.prices.is_empty());

        let comparison = report.comparison.unwrap();
        assert_eq!(comparison.matrix.symbols, vec!["AAA", "CCC"]);
        assert_eq!(comparison.matrix.observations, 3);
        assert_eq!(comparison.prices.len(), 2);
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_news_failure_keeps_section() {
        let mut news = MockNewsSource::new();
        news.expect_fetch_news()
            .returning(|_| Err(StockError::ApiError("Finnhub API error 429".to_string())));
        let hot = dashboard(news, price_mock());

        let report = hot
            .build(&DashboardOptions::new(tickers(&["AAA"]), date(5)))
            .await;

        assert_eq!(report.sections.len(), 1);
        assert!(report.sections[0].headlines.is_empty());
        assert!(report.comparison.is_none());
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_no_gainers() {
        let hot = dashboard(MockNewsSource::new(), price_mock());
        let report = hot
            .build(&DashboardOptions::new(tickers(&["NOPE", "ONE"]), date(5)))
            .await;

        assert!(report.is_empty());
        assert_eq!(report.warnings, vec!["No gainers found! Try again later."]);
    }
}
