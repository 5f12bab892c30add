//! Error types for provider and pipeline operations

use thiserror::Error;

/// Errors raised while fetching, caching or validating market and news data
#[derive(Debug, Error)]
pub enum StockError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// NewsAPI answered with a non-ok status
    #[error("Error fetching news: {message}")]
    NewsApi { message: String },

    /// Date string is not YYYY-MM-DD
    #[error("Invalid date: '{0}'. Use YYYY-MM-DD format.")]
    InvalidDate(String),

    /// Date falls outside the provider's retention window
    #[error("{0}")]
    DateOutOfRange(String),

    /// Start date after end date
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: String, end: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Cache error
    #[error("Cache error: {0}")]
    CacheError(String),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline computation error
    #[error(transparent)]
    Core(#[from] newswatch_core::CoreError),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<newswatch_utils::ConfigError> for StockError {
    fn from(err: newswatch_utils::ConfigError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}
