//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors raised by the aggregation core (run detection, statistics, binning)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Distribution is empty: {0}")]
    EmptyDistribution(String),

    #[error("Malformed signal: {0}")]
    MalformedSignal(String),

    #[error("Signal sequence is empty")]
    EmptySignals,

    #[error("Run length at index {0} is zero")]
    ZeroRunLength(usize),
}

/// Errors that can occur while extracting signals from a capture
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid capture format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported input: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Signal(#[from] AggregationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during histogram rendering
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Histogram has no buckets to draw")]
    EmptyHistogram,

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Output directory not found: {0}")]
    DirectoryNotFound(String),
}

/// Errors that can occur while loading an analysis config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    InvalidToml(#[from] toml::de::Error),
}
