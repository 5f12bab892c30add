//! Error types for newswatch-core

use thiserror::Error;

/// Result type alias for newswatch-core
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error type for pipeline computations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Not enough series or observations to compute a statistic
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::InsufficientData("need at least two tickers".to_string());
        assert_eq!(err.to_string(), "Insufficient data: need at least two tickers");
    }
}
