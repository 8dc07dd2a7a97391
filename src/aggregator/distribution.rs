//! Run-length distribution and its summary statistics.

use super::run_length::RunLength;
use crate::utils::error::AggregationError;

/// Ordered run-lengths of one capture, in detection order
///
/// **Public** - returned from `aggregate`, consumed by the binner and renderer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    run_lengths: Vec<RunLength>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a distribution from already computed run-lengths
    ///
    /// # Errors
    /// * `AggregationError::ZeroRunLength` - a burst cannot hold zero packets
    pub fn from_run_lengths(run_lengths: Vec<RunLength>) -> Result<Self, AggregationError> {
        if let Some(index) = run_lengths.iter().position(|&length| length == 0) {
            return Err(AggregationError::ZeroRunLength(index));
        }
        Ok(Self { run_lengths })
    }

    pub(crate) fn push(&mut self, run_length: RunLength) {
        debug_assert!(run_length > 0, "bursts always hold at least one packet");
        self.run_lengths.push(run_length);
    }

    pub fn run_lengths(&self) -> &[RunLength] {
        &self.run_lengths
    }

    /// Number of bursts
    pub fn len(&self) -> usize {
        self.run_lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.run_lengths.is_empty()
    }

    /// Number of underlying packets. Zero for an empty distribution.
    pub fn total_packets(&self) -> u64 {
        self.run_lengths.iter().sum()
    }

    /// Arithmetic mean of the run-lengths
    ///
    /// # Errors
    /// * `AggregationError::EmptyDistribution` - the mean of nothing is undefined
    pub fn mean_run_length(&self) -> Result<f64, AggregationError> {
        if self.run_lengths.is_empty() {
            return Err(AggregationError::EmptyDistribution(
                "cannot compute the mean run length of zero bursts".to_string(),
            ));
        }
        Ok(self.total_packets() as f64 / self.run_lengths.len() as f64)
    }

    pub fn max_run_length(&self) -> Option<RunLength> {
        self.run_lengths.iter().copied().max()
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        match self.mean_run_length() {
            Ok(mean) => format!(
                "Bursts: {} | Packets: {} | Mean: {:.2} | Max: {}",
                self.len(),
                self.total_packets(),
                mean,
                self.max_run_length().unwrap_or(0)
            ),
            Err(_) => "Bursts: 0 | Packets: 0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_run_length() {
        let dist = Distribution::from_run_lengths(vec![2, 4, 6]).unwrap();
        assert_eq!(dist.mean_run_length().unwrap(), 4.0);
        assert_eq!(dist.total_packets(), 12);
        assert_eq!(dist.max_run_length(), Some(6));
    }

    #[test]
    fn test_empty_distribution() {
        let dist = Distribution::new();
        assert_eq!(dist.total_packets(), 0);
        assert_eq!(dist.max_run_length(), None);
        assert!(matches!(
            dist.mean_run_length(),
            Err(AggregationError::EmptyDistribution(_))
        ));
    }

    #[test]
    fn test_zero_run_length_rejected() {
        assert_eq!(
            Distribution::from_run_lengths(vec![3, 0, 1]),
            Err(AggregationError::ZeroRunLength(1))
        );
    }

    #[test]
    fn test_detection_order_preserved() {
        let dist = Distribution::from_run_lengths(vec![5, 1, 3]).unwrap();
        assert_eq!(dist.run_lengths(), &[5, 1, 3]);
        assert_eq!(dist.summary(), "Bursts: 3 | Packets: 9 | Mean: 3.00 | Max: 5");
    }
}
