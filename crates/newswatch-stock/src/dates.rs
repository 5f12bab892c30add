//! Date parsing and the news provider's retention window
//!
//! Every user-supplied date is checked here before a request is built.

use crate::error::{Result, StockError};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Days of history the free news plan serves
pub const DEFAULT_RETENTION_DAYS: u32 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current UTC calendar day
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| StockError::InvalidDate(input.to_string()))
}

/// Format a date the way the providers expect it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// How far back the news provider can be queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionWindow {
    pub days: u32,
}

impl RetentionWindow {
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    /// Oldest queryable day, inclusive
    pub fn earliest(&self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(i64::from(self.days))
    }

    /// Reject dates older than the window or later than `today`
    pub fn check(&self, date: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
        if date < self.earliest(today) {
            return Err(StockError::DateOutOfRange(format!(
                "Date too old: '{}'. Free plan only allows last {} days.",
                format_date(date),
                self.days
            )));
        }
        if date > today {
            return Err(StockError::DateOutOfRange(format!(
                "Date is in the future: '{}'.",
                format_date(date)
            )));
        }
        Ok(date)
    }

    /// Parse and check in one step
    pub fn parse(&self, input: &str, today: NaiveDate) -> Result<NaiveDate> {
        self.check(parse_date(input)?, today)
    }
}

impl Default for RetentionWindow {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_DAYS)
    }
}

/// Optional start and end day of a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Build a range, rejecting `start > end`
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(StockError::InvalidRange {
                    start: format_date(s),
                    end: format_date(e),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// No bounds; the provider picks its default
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The `days` days up to and including `today`
    pub fn last_days(days: u32, today: NaiveDate) -> Self {
        Self {
            start: Some(today - Duration::days(i64::from(days))),
            end: Some(today),
        }
    }

    /// Concrete bounds for price lookups: open ends fall back to
    /// `today - fallback_days` and `today`
    pub fn resolve(&self, today: NaiveDate, fallback_days: u32) -> (NaiveDate, NaiveDate) {
        let end = self.end.unwrap_or(today);
        let start = self
            .start
            .unwrap_or_else(|| end - Duration::days(i64::from(fallback_days)));
        (start, end)
    }

    /// Validate both ends against `window`
    pub fn check(&self, window: &RetentionWindow, today: NaiveDate) -> Result<()> {
        for date in [self.start, self.end].into_iter().flatten() {
            window.check(date, today)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-02").unwrap(), date(2024, 1, 2));
        assert_eq!(parse_date(" 2024-01-02 ").unwrap(), date(2024, 1, 2));

        for bad in ["2024/01/02", "02-01-2024", "2024-02-30", "yesterday", ""] {
            let err = parse_date(bad).unwrap_err();
            assert!(matches!(err, StockError::InvalidDate(_)), "{bad} should be invalid");
        }
    }

    #[test]
    fn test_retention_window_bounds() {
        let today = date(2024, 3, 31);
        let window = RetentionWindow::default();

        assert_eq!(window.earliest(today), date(2024, 3, 1));
        assert!(window.check(date(2024, 3, 1), today).is_ok());
        assert!(window.check(today, today).is_ok());

        let err = window.check(date(2024, 2, 29), today).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Date too old: '2024-02-29'. Free plan only allows last 30 days."
        );

        let err = window.check(date(2024, 4, 1), today).unwrap_err();
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn test_window_parse_reports_format_first() {
        let window = RetentionWindow::new(7);
        let err = window.parse("31/03/2024", date(2024, 3, 31)).unwrap_err();
        assert!(matches!(err, StockError::InvalidDate(_)));
    }

    #[test]
    fn test_range_rejects_reversed_bounds() {
        let err = DateRange::new(Some(date(2024, 1, 5)), Some(date(2024, 1, 4))).unwrap_err();
        assert!(matches!(err, StockError::InvalidRange { .. }));
        assert!(DateRange::new(Some(date(2024, 1, 5)), Some(date(2024, 1, 5))).is_ok());
        assert!(DateRange::new(None, Some(date(2024, 1, 5))).is_ok());
    }

    #[test]
    fn test_range_resolve() {
        let today = date(2024, 1, 31);
        let (start, end) = DateRange::unbounded().resolve(today, 7);
        assert_eq!((start, end), (date(2024, 1, 24), today));

        let range = DateRange::new(None, Some(date(2024, 1, 10))).unwrap();
        assert_eq!(range.resolve(today, 3), (date(2024, 1, 7), date(2024, 1, 10)));

        let range = DateRange::last_days(7, today);
        assert_eq!(range.resolve(today, 99), (date(2024, 1, 24), today));
    }

    #[test]
    fn test_range_check() {
        let today = date(2024, 1, 31);
        let window = RetentionWindow::default();
        let range = DateRange::new(Some(date(2023, 12, 1)), None).unwrap();
        assert!(range.check(&window, today).is_err());
        assert!(DateRange::last_days(7, today).check(&window, today).is_ok());
    }
}
