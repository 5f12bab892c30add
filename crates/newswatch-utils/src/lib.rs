//! Shared utilities for newswatch
//!
//! This crate provides the ambient pieces used across the newswatch workspace:
//! tracing setup and typed access to environment configuration.

pub mod config;
pub mod logging;

pub use config::{ConfigError, EnvLookup, EnvReader, ProcessEnv};
pub use logging::{init_tracing_with, LogFormat, LogOptions};
