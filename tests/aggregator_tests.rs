use aggregation_dist::aggregator::{
    aggregate, bin, AggregationStrategy, Distribution, GroupIdStrategy, TimeGapStrategy,
};
use aggregation_dist::parser::{GroupedSignal, SignalSequence, TimedSignal};
use aggregation_dist::utils::error::AggregationError;
use pretty_assertions::assert_eq;

fn timed(times_us: &[f64]) -> Vec<TimedSignal> {
    times_us
        .iter()
        .map(|&t| TimedSignal::from_micros(t).unwrap())
        .collect()
}

fn grouped(ids: &[Option<i64>]) -> Vec<GroupedSignal> {
    ids.iter().map(|&id| GroupedSignal::new(id)).collect()
}

fn labelled(distribution: &Distribution, max_shown: Option<i64>) -> Vec<(String, u64)> {
    bin(distribution, max_shown)
        .unwrap()
        .buckets()
        .iter()
        .map(|bucket| (bucket.label.to_string(), bucket.count))
        .collect()
}

#[test]
fn test_time_gap_close_arrivals_form_one_burst() {
    let times: Vec<f64> = (0..50).map(|i| i as f64 * 399.0).collect();
    let runs = TimeGapStrategy::new().detect(&timed(&times));
    assert_eq!(runs, vec![50]);
}

#[test]
fn test_time_gap_literal_example() {
    let runs = TimeGapStrategy::new().detect(&timed(&[0.0, 500.0, 600.0]));
    assert_eq!(runs, vec![1, 2]);
}

#[test]
fn test_group_id_literal_example() {
    let runs = GroupIdStrategy.detect(&grouped(&[Some(5), Some(5), None, None, Some(5)]));
    assert_eq!(runs, vec![2, 2, 1]);
}

#[test]
fn test_run_lengths_sum_to_signal_count() {
    let times = [0.0, 10.0, 900.0, 905.0, 905.0, 3_000.0, 2_999.0, 10_000.0];
    let dist = aggregate(
        &SignalSequence::Timed(timed(&times)),
        &TimeGapStrategy::new(),
    );
    assert_eq!(dist.total_packets(), times.len() as u64);

    let ids = [None, Some(1), Some(1), None, Some(2), Some(2), Some(2), None, None];
    let dist = aggregate(
        &SignalSequence::Grouped(grouped(&ids)),
        &TimeGapStrategy::new(),
    );
    assert_eq!(dist.total_packets(), ids.len() as u64);
    assert_eq!(dist.run_lengths(), &[1, 2, 1, 3, 2]);
}

#[test]
fn test_histogram_with_overflow() {
    let dist = Distribution::from_run_lengths(vec![1, 1, 2, 5, 7]).unwrap();
    assert_eq!(
        labelled(&dist, Some(3)),
        vec![
            ("1".to_string(), 2),
            ("2".to_string(), 1),
            ("3".to_string(), 0),
            ("4+".to_string(), 2),
        ]
    );
}

#[test]
fn test_histogram_auto_range() {
    let dist = Distribution::from_run_lengths(vec![1, 3, 3]).unwrap();
    assert_eq!(
        labelled(&dist, None),
        vec![("1".to_string(), 1), ("2".to_string(), 0), ("3".to_string(), 2)]
    );
}

#[test]
fn test_histogram_max_shown_one() {
    let dist = Distribution::from_run_lengths(vec![1, 1, 2]).unwrap();
    assert_eq!(
        labelled(&dist, Some(1)),
        vec![("1".to_string(), 2), ("2+".to_string(), 1)]
    );
}

#[test]
fn test_histogram_counts_sum_to_bursts() {
    let dist = Distribution::from_run_lengths(vec![9, 3, 1, 1, 14, 2, 2, 2]).unwrap();
    for max_shown in [None, Some(1), Some(4), Some(20)] {
        assert_eq!(bin(&dist, max_shown).unwrap().total(), dist.len() as u64);
    }
}

#[test]
fn test_mean_run_length() {
    let dist = Distribution::from_run_lengths(vec![2, 4, 6]).unwrap();
    assert_eq!(dist.mean_run_length().unwrap(), 4.0);

    assert!(matches!(
        Distribution::new().mean_run_length(),
        Err(AggregationError::EmptyDistribution(_))
    ));
}

#[test]
fn test_binning_is_idempotent() {
    let dist = Distribution::from_run_lengths(vec![3, 1, 8, 2]).unwrap();
    assert_eq!(bin(&dist, Some(4)).unwrap(), bin(&dist, Some(4)).unwrap());
}
