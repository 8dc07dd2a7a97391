//! Fold a run-length distribution into histogram buckets.
//!
//! Buckets are unit-wide and centred on integers (edges at `k - 0.5` and
//! `k + 0.5`), so every integer run-length lands in exactly one bucket.
//! With a ceiling `max_shown`, everything above it goes to a single
//! overflow bucket labelled `"{max_shown + 1}+"`.

use super::distribution::Distribution;
use super::run_length::RunLength;
use crate::utils::error::AggregationError;
use log::debug;
use std::fmt;

/// Label of a histogram bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketLabel {
    /// Run-lengths equal to this value
    Exact(RunLength),
    /// Run-lengths greater than or equal to this value
    Overflow(RunLength),
}

impl BucketLabel {
    pub fn is_overflow(&self) -> bool {
        matches!(self, BucketLabel::Overflow(_))
    }
}

impl fmt::Display for BucketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketLabel::Exact(value) => write!(f, "{}", value),
            BucketLabel::Overflow(value) => write!(f, "{}+", value),
        }
    }
}

/// One histogram column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub label: BucketLabel,
    pub count: u64,
}

/// Bucketed view of a distribution, ascending, overflow bucket last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    max_shown: Option<RunLength>,
    buckets: Vec<Bucket>,
}

impl Histogram {
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Ceiling used for the overflow bucket, `None` for an auto-sized range
    pub fn max_shown(&self) -> Option<RunLength> {
        self.max_shown
    }

    pub fn overflow(&self) -> Option<&Bucket> {
        self.buckets.last().filter(|bucket| bucket.label.is_overflow())
    }

    /// Sum of all counts, equal to the number of bursts binned
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.buckets.iter().map(|bucket| bucket.count).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Check a user supplied ceiling
///
/// # Errors
/// * `AggregationError::InvalidConfiguration` - ceiling below 1
pub fn validate_max_shown(max_shown: i64) -> Result<RunLength, AggregationError> {
    if max_shown < 1 {
        return Err(AggregationError::InvalidConfiguration(format!(
            "max shown aggregation must be greater than 0, got {}",
            max_shown
        )));
    }
    Ok(max_shown as RunLength)
}

/// Bin a distribution into histogram buckets
///
/// **Public** - main entry point for binning
///
/// # Arguments
/// * `distribution` - Run-lengths to count
/// * `max_shown` - Last exact bucket; larger values go to the overflow bucket.
///   `None` spans `1..=max(run-lengths)` with no overflow bucket.
///
/// # Errors
/// * `AggregationError::InvalidConfiguration` - `max_shown` below 1, or too large to allocate
/// * `AggregationError::EmptyDistribution` - auto-sized range over no data
pub fn bin(distribution: &Distribution, max_shown: Option<i64>) -> Result<Histogram, AggregationError> {
    let (ceiling, with_overflow) = match max_shown {
        Some(value) => (validate_max_shown(value)?, true),
        None => {
            let largest = distribution.max_run_length().ok_or_else(|| {
                AggregationError::EmptyDistribution(
                    "cannot size histogram range without any bursts".to_string(),
                )
            })?;
            (largest, false)
        }
    };

    debug!(
        "Binning {} bursts into {} buckets{}",
        distribution.len(),
        ceiling,
        if with_overflow { " + overflow" } else { "" }
    );

    // One bucket per value up to the ceiling, plus the overflow bucket
    let too_large = || {
        AggregationError::InvalidConfiguration(format!(
            "cannot allocate {} histogram buckets, lower the max shown aggregation",
            ceiling
        ))
    };
    let capacity = usize::try_from(ceiling)
        .ok()
        .and_then(|exact| exact.checked_add(1))
        .ok_or_else(too_large)?;

    let mut buckets: Vec<Bucket> = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| too_large())?;

    buckets.extend((1..=ceiling).map(|value| Bucket {
        label: BucketLabel::Exact(value),
        count: 0,
    }));

    let mut overflow = 0u64;
    for &length in distribution.run_lengths() {
        if length > ceiling {
            overflow += 1;
        } else {
            buckets[(length - 1) as usize].count += 1;
        }
    }

    if with_overflow {
        buckets.push(Bucket {
            label: BucketLabel::Overflow(ceiling + 1),
            count: overflow,
        });
    }

    Ok(Histogram {
        max_shown: with_overflow.then_some(ceiling),
        buckets,
    })
}
