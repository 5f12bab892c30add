//! Typed access to configuration held in environment variables

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Malformed configuration value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Source of raw configuration values
pub trait EnvLookup {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Reads trimmed, non-empty values from an [`EnvLookup`]
#[derive(Debug, Clone, Default)]
pub struct EnvReader<L = ProcessEnv> {
    source: L,
}

impl EnvReader<ProcessEnv> {
    /// Reader over the process environment
    pub fn process() -> Self {
        Self { source: ProcessEnv }
    }
}

impl<L: EnvLookup> EnvReader<L> {
    pub fn new(source: L) -> Self {
        Self { source }
    }

    /// Value of `key`; unset and blank are both `None`
    pub fn string(&self, key: &str) -> Option<String> {
        self.source
            .lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Parse `key` into `T`
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.string(key)
            .map(|raw| {
                raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                    key: key.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    /// Comma separated list; empty items are dropped
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        let items: Vec<String> = self
            .string(key)?
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToString::to_string)
            .collect();
        (!items.is_empty()).then_some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(pairs: &[(&str, &str)]) -> EnvReader<HashMap<String, String>> {
        EnvReader::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_string_trims_and_skips_blank() {
        let env = reader(&[("KEY", "  abc "), ("BLANK", "   ")]);
        assert_eq!(env.string("KEY"), Some("abc".to_string()));
        assert_eq!(env.string("BLANK"), None);
        assert_eq!(env.string("MISSING"), None);
    }

    #[test]
    fn test_parse() {
        let env = reader(&[("TTL", "3600"), ("BAD", "soon")]);
        assert_eq!(env.parse::<u64>("TTL").unwrap(), Some(3600));
        assert_eq!(env.parse::<u64>("MISSING").unwrap(), None);

        let err = env.parse::<u64>("BAD").unwrap_err();
        assert!(err.to_string().starts_with("Invalid value for BAD: 'soon'"));
    }

    #[test]
    fn test_list() {
        let env = reader(&[("TICKERS", "AAPL, MSFT,,TSLA "), ("EMPTY", ",,")]);
        assert_eq!(
            env.list("TICKERS"),
            Some(vec!["AAPL".to_string(), "MSFT".to_string(), "TSLA".to_string()])
        );
        assert_eq!(env.list("EMPTY"), None);
    }
}
