//! Yahoo Finance API client

use crate::error::{Result, StockError};
use crate::source::PriceSource;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use newswatch_core::PriceBar;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

/// Daily bar for a quote stamped with Unix seconds `timestamp`
fn price_bar(timestamp: i64, close: f64) -> Option<PriceBar> {
    let date = DateTime::from_timestamp(timestamp, 0)?.date_naive();
    Some(PriceBar::new(date, close))
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Daily closes for a symbol between `start` and `end` (exclusive)
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        Ok(quotes
            .iter()
            .filter_map(|q| price_bar(q.timestamp as i64, q.close))
            .collect())
    }
}

#[async_trait]
impl PriceSource for YahooFinanceClient {
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        // The upper bound is exclusive on Yahoo's side
        let start = start.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = (end + Duration::days(1)).and_time(chrono::NaiveTime::MIN).and_utc();

        let mut bars = self.get_historical_quotes(symbol, start, end).await?;
        if bars.is_empty() {
            return Err(StockError::YahooFinanceError(format!(
                "No price data for {symbol}"
            )));
        }

        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_price_bar_from_timestamp() {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap().timestamp();
        assert_eq!(
            price_bar(stamp, 1.5),
            Some(PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 1.5))
        );
        assert!(price_bar(i64::MAX, 1.5).is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_daily_bars() {
        let client = YahooFinanceClient::new();
        let end = Utc::now().date_naive();
        let bars = client
            .daily_bars("AAPL", end - Duration::days(14), end)
            .await
            .unwrap();

        assert!(!bars.is_empty());
        assert!(bars.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_unknown_symbol_fails() {
        let client = YahooFinanceClient::new();
        let end = Utc::now().date_naive();
        let result = client
            .daily_bars("INVALID_SYMBOL_12345", end - Duration::days(14), end)
            .await;
        assert!(result.is_err());
    }
}
