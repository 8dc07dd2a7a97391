//! Output JSON schema definitions for aggregation reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{Distribution, Histogram};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::AggregationError;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Run name (also the stem of the output files)
    pub name: String,

    /// Capture file that was analysed
    pub source: String,

    /// Detection strategy used ("time-gap" or "group-id")
    pub strategy: String,

    /// Packets per aggregation burst, in detection order
    pub run_lengths: Vec<u64>,

    /// Number of received packets (sum of run lengths)
    pub total_packets: u64,

    /// Mean packets per burst
    pub mean_run_length: f64,

    /// Bucketed counts as plotted
    pub histogram: HistogramSummary,

    /// Timestamp when report was generated
    pub generated_at: String,
}

/// Serialized histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    /// Last exact bucket before the overflow bucket, absent for auto range
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_shown: Option<u64>,

    pub buckets: Vec<BucketCount>,
}

/// A single histogram column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    /// "3" for an exact bucket, "21+" for the overflow bucket
    pub label: String,
    pub count: u64,
}

impl From<&Histogram> for HistogramSummary {
    fn from(histogram: &Histogram) -> Self {
        Self {
            max_shown: histogram.max_shown(),
            buckets: histogram
                .buckets()
                .iter()
                .map(|bucket| BucketCount {
                    label: bucket.label.to_string(),
                    count: bucket.count,
                })
                .collect(),
        }
    }
}

/// Convert analysis results to the output report format
///
/// **Public** - used by commands to create final output
///
/// # Errors
/// * `AggregationError::EmptyDistribution` - no bursts, so no mean
pub fn to_report(
    name: &str,
    source: &str,
    strategy: &str,
    distribution: &Distribution,
    histogram: &Histogram,
) -> Result<AggregationReport, AggregationError> {
    use chrono::Utc;

    Ok(AggregationReport {
        version: SCHEMA_VERSION.to_string(),
        name: name.to_string(),
        source: source.to_string(),
        strategy: strategy.to_string(),
        run_lengths: distribution.run_lengths().to_vec(),
        total_packets: distribution.total_packets(),
        mean_run_length: distribution.mean_run_length()?,
        histogram: HistogramSummary::from(histogram),
        generated_at: Utc::now().to_rfc3339(),
    })
}
