//! Aggregation of packet signals into burst statistics.
//!
//! This module transforms extracted capture signals into:
//! - Run-lengths (packets per aggregation burst)
//! - Distribution statistics (total packets, mean burst size)
//! - Histogram buckets with an optional overflow bucket

pub mod distribution;
pub mod histogram;
pub mod run_length;

// Re-export main types and functions
pub use distribution::Distribution;
pub use histogram::{bin, validate_max_shown, Bucket, BucketLabel, Histogram};
pub use run_length::{
    aggregate, AggregationStrategy, GroupIdStrategy, RunLength, RunState, TimeGapStrategy,
};
