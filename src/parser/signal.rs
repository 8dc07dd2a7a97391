//! Per-packet signals handed from the capture readers to the aggregator.
//!
//! A capture yields exactly one kind of signal: arrival timestamps or
//! hardware aggregation-group identifiers. The two kinds never mix
//! inside one analysis run.

use crate::aggregator::{AggregationStrategy, GroupIdStrategy, TimeGapStrategy};
use crate::utils::config::NANOS_PER_MICRO;
use crate::utils::error::AggregationError;
use std::fmt;

/// Packet arrival time, relative to the start of the capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedSignal {
    pub arrival_time_us: f64,
}

impl TimedSignal {
    pub fn from_micros(arrival_time_us: f64) -> Result<Self, AggregationError> {
        if !arrival_time_us.is_finite() {
            return Err(AggregationError::MalformedSignal(format!(
                "arrival time {} is not a finite number",
                arrival_time_us
            )));
        }
        Ok(Self { arrival_time_us })
    }

    /// Capture exports record nanoseconds; the time-gap rule works in microseconds
    pub fn from_nanos(arrival_time_ns: f64) -> Result<Self, AggregationError> {
        Self::from_micros(arrival_time_ns / NANOS_PER_MICRO)
    }
}

/// Hardware aggregation group of a packet. `None` means ungrouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedSignal {
    pub group_id: Option<i64>,
}

impl GroupedSignal {
    pub fn new(group_id: Option<i64>) -> Self {
        Self { group_id }
    }

    pub fn ungrouped() -> Self {
        Self { group_id: None }
    }
}

/// A single per-packet signal of either kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Timed(TimedSignal),
    Grouped(GroupedSignal),
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::Timed(_) => SignalKind::Timed,
            Signal::Grouped(_) => SignalKind::Grouped,
        }
    }
}

/// Which kind of signal a capture provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Timed,
    Grouped,
}

impl SignalKind {
    /// Name of the detection strategy that consumes this kind
    pub fn strategy_name(&self) -> &'static str {
        match self {
            SignalKind::Timed => TimeGapStrategy::default().name(),
            SignalKind::Grouped => GroupIdStrategy.name(),
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Timed => write!(f, "timestamps"),
            SignalKind::Grouped => write!(f, "group identifiers"),
        }
    }
}

/// Ordered signals of a single kind, as consumed by the aggregator
#[derive(Debug, Clone, PartialEq)]
pub enum SignalSequence {
    Timed(Vec<TimedSignal>),
    Grouped(Vec<GroupedSignal>),
}

impl SignalSequence {
    /// Classify a list of loose signals into a single-kind sequence.
    ///
    /// # Errors
    /// * `AggregationError::EmptySignals` - nothing to classify
    /// * `AggregationError::MalformedSignal` - the list mixes both kinds
    pub fn from_signals(signals: Vec<Signal>) -> Result<Self, AggregationError> {
        let first = signals.first().ok_or(AggregationError::EmptySignals)?;

        match first.kind() {
            SignalKind::Timed => signals
                .into_iter()
                .enumerate()
                .map(|(index, signal)| match signal {
                    Signal::Timed(timed) => Ok(timed),
                    Signal::Grouped(_) => Err(mixed_kinds(index, SignalKind::Timed)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(SignalSequence::Timed),
            SignalKind::Grouped => signals
                .into_iter()
                .enumerate()
                .map(|(index, signal)| match signal {
                    Signal::Grouped(grouped) => Ok(grouped),
                    Signal::Timed(_) => Err(mixed_kinds(index, SignalKind::Grouped)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(SignalSequence::Grouped),
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            SignalSequence::Timed(_) => SignalKind::Timed,
            SignalSequence::Grouped(_) => SignalKind::Grouped,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SignalSequence::Timed(signals) => signals.len(),
            SignalSequence::Grouped(signals) => signals.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn mixed_kinds(index: usize, expected: SignalKind) -> AggregationError {
    AggregationError::MalformedSignal(format!(
        "signal {} does not match the {} that started the sequence",
        index, expected
    ))
}
