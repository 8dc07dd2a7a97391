//! Aggregation burst detection.
//!
//! Turns an ordered stream of per-packet signals into run-lengths: the
//! number of consecutive packets the radio sent as one aggregate.
//!
//! Two strategies exist, one per signal kind:
//! - time-gap: a burst ends when the arrival gap exceeds a threshold
//! - group-id: a burst ends when the hardware group identifier changes
//!
//! Both run the same single-pass accumulator; only the boundary rule differs.

use super::distribution::Distribution;
use crate::parser::{GroupedSignal, SignalSequence, TimedSignal};
use crate::utils::config::DEFAULT_GAP_THRESHOLD_US;
use crate::utils::error::AggregationError;
use log::debug;

/// Packet count of one aggregation burst (always positive)
pub type RunLength = u64;

/// State of the burst accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No signal seen yet
    #[default]
    NoActiveRun,
    /// A burst is open with this many signals in it
    ActiveRun(RunLength),
}

impl RunState {
    /// Feed one signal. `boundary` tells whether this signal starts a new
    /// burst relative to the previous one.
    ///
    /// Returns the burst that was closed, if any. A boundary seen while no
    /// run is active closes nothing.
    pub fn advance(&mut self, boundary: bool) -> Option<RunLength> {
        match *self {
            RunState::NoActiveRun => {
                *self = RunState::ActiveRun(1);
                None
            }
            RunState::ActiveRun(length) if boundary => {
                *self = RunState::ActiveRun(1);
                Some(length)
            }
            RunState::ActiveRun(length) => {
                *self = RunState::ActiveRun(length + 1);
                None
            }
        }
    }

    /// Terminal transition at end of input: flush the trailing burst
    pub fn finish(self) -> Option<RunLength> {
        match self {
            RunState::NoActiveRun => None,
            RunState::ActiveRun(length) => Some(length),
        }
    }
}

/// Split `signals` into runs using `is_boundary(previous_key, current_key)`.
///
/// `initial` is the key the first signal is compared against.
fn split_runs<T, K>(
    signals: &[T],
    initial: K,
    key: impl Fn(&T) -> K,
    is_boundary: impl Fn(&K, &K) -> bool,
) -> Vec<RunLength> {
    let mut state = RunState::default();
    let mut previous = initial;
    let mut runs = Vec::new();

    for signal in signals {
        let current = key(signal);
        if let Some(closed) = state.advance(is_boundary(&previous, &current)) {
            runs.push(closed);
        }
        previous = current;
    }

    runs.extend(state.finish());
    runs
}

/// A burst detection rule for one kind of signal
pub trait AggregationStrategy {
    type Signal;

    /// Short name written into reports
    fn name(&self) -> &'static str;

    /// Detect bursts in order. The run-lengths sum to `signals.len()`.
    fn detect(&self, signals: &[Self::Signal]) -> Vec<RunLength>;
}

/// Bursts separated by arrival gaps larger than a threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGapStrategy {
    threshold_us: f64,
}

impl Default for TimeGapStrategy {
    fn default() -> Self {
        Self {
            threshold_us: DEFAULT_GAP_THRESHOLD_US,
        }
    }
}

impl TimeGapStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// * `AggregationError::InvalidConfiguration` - threshold not a positive finite number
    pub fn with_threshold(threshold_us: f64) -> Result<Self, AggregationError> {
        if !threshold_us.is_finite() || threshold_us <= 0.0 {
            return Err(AggregationError::InvalidConfiguration(format!(
                "gap threshold must be a positive number of microseconds, got {}",
                threshold_us
            )));
        }
        Ok(Self { threshold_us })
    }

    pub fn threshold_us(&self) -> f64 {
        self.threshold_us
    }
}

impl AggregationStrategy for TimeGapStrategy {
    type Signal = TimedSignal;

    fn name(&self) -> &'static str {
        "time-gap"
    }

    fn detect(&self, signals: &[TimedSignal]) -> Vec<RunLength> {
        // The first signal is compared against time zero. Its gap may exceed
        // the threshold, but with no open run nothing is emitted.
        split_runs(
            signals,
            0.0,
            |signal| signal.arrival_time_us,
            |previous, current| current - previous > self.threshold_us,
        )
    }
}

/// Bursts sharing the same hardware aggregation group identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupIdStrategy;

impl AggregationStrategy for GroupIdStrategy {
    type Signal = GroupedSignal;

    fn name(&self) -> &'static str {
        "group-id"
    }

    fn detect(&self, signals: &[GroupedSignal]) -> Vec<RunLength> {
        // Ungrouped compares equal to ungrouped, so consecutive ungrouped
        // packets stay in one burst.
        split_runs(
            signals,
            None,
            |signal| signal.group_id,
            |previous, current| previous != current,
        )
    }
}

/// Run the strategy matching the sequence's signal kind
///
/// **Public** - main entry point for burst detection
///
/// # Arguments
/// * `sequence` - Ordered signals from a capture
/// * `time_gap` - Rule used when the capture provides timestamps
///
/// # Returns
/// Distribution of run-lengths in detection order
pub fn aggregate(sequence: &SignalSequence, time_gap: &TimeGapStrategy) -> Distribution {
    let runs = match sequence {
        SignalSequence::Timed(signals) => {
            debug!(
                "Detecting {} bursts in {} timestamps (gap > {} us)",
                time_gap.name(),
                signals.len(),
                time_gap.threshold_us()
            );
            time_gap.detect(signals)
        }
        SignalSequence::Grouped(signals) => {
            debug!(
                "Detecting {} bursts in {} group identifiers",
                GroupIdStrategy.name(),
                signals.len()
            );
            GroupIdStrategy.detect(signals)
        }
    };

    debug!("Detected {} aggregation bursts", runs.len());

    let mut distribution = Distribution::new();
    for run in runs {
        distribution.push(run);
    }
    distribution
}
