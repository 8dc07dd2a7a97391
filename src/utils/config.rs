//! Configuration and constants for the CLI.

use super::error::ConfigError;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Value of the last histogram column before the overflow column
pub const DEFAULT_MAX_SHOWN: i64 = 20;

/// Arrival gap (microseconds) above which a new aggregation burst starts
pub const DEFAULT_GAP_THRESHOLD_US: f64 = 400.0;

// Capture exports store arrival times in nanoseconds, the time-gap rule works in microseconds
pub const NANOS_PER_MICRO: f64 = 1_000.0;

/// Run name used for output files when none is given
pub const DEFAULT_RUN_NAME: &str = "unknown";

// Field names for JSON capture exports (different exporters use different names)
pub const TIMESTAMP_FIELD_NAMES: &[&str] = &[
    "timesReceivedInNanoseconds",
    "times_received_in_nanoseconds",
    "timestamps_ns",
];
pub const GROUP_FIELD_NAMES: &[&str] = &["ampduReferences", "ampdu_references", "group_ids"];

/// Optional analysis settings loaded from a TOML file.
///
/// Every field is optional; command-line flags win over file values.
///
/// ```toml
/// name = "office-ap"
/// output_dir = "plots"
/// max_shown = 16
/// gap_threshold_us = 400.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    pub name: Option<String>,
    pub output_dir: Option<String>,
    pub max_shown: Option<i64>,
    /// `true` disables the overflow column
    #[serde(default)]
    pub no_max: bool,
    pub gap_threshold_us: Option<f64>,
}

/// Load analysis settings from a TOML file
///
/// # Errors
/// * `ConfigError::ReadFailed` - If file cannot be read
/// * `ConfigError::InvalidToml` - If TOML is invalid or has unknown keys
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading analysis config from: {}", path.display());

    let contents = std::fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;
    Ok(config)
}
