use aggregation_dist::aggregator::{aggregate, TimeGapStrategy};
use aggregation_dist::parser::pcap::LINKTYPE_IEEE802_11_RADIOTAP;
use aggregation_dist::parser::{extract_signals, SignalKind, SignalMode, SignalSequence};
use aggregation_dist::utils::error::{AggregationError, ParseError};
use std::path::Path;

const LINKTYPE_ETHERNET: u32 = 1;

/// Radiotap header carrying only the A-MPDU status field
fn radiotap(reference: Option<u32>) -> Vec<u8> {
    match reference {
        Some(reference) => {
            let mut header = vec![0u8, 0, 16, 0];
            header.extend_from_slice(&(1u32 << 20).to_le_bytes());
            header.extend_from_slice(&reference.to_le_bytes());
            header.extend_from_slice(&[0; 4]);
            header
        }
        None => {
            let mut header = vec![0u8, 0, 8, 0];
            header.extend_from_slice(&0u32.to_le_bytes());
            header
        }
    }
}

/// Little-endian microsecond pcap with one record per (seconds, micros, payload)
fn pcap(link_type: u32, records: &[(u32, u32, Vec<u8>)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&4u16.to_le_bytes());
    bytes.extend_from_slice(&0i32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&65535u32.to_le_bytes());
    bytes.extend_from_slice(&link_type.to_le_bytes());

    for (sec, usec, payload) in records {
        bytes.extend_from_slice(&sec.to_le_bytes());
        bytes.extend_from_slice(&usec.to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(payload);
    }
    bytes
}

fn write_temp(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_extract_json_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(
        dir.path(),
        "capture.json",
        br#"{ "timesReceivedInNanoseconds": [0, 500000, 600000] }"#,
    );

    let signals = extract_signals(&path, SignalMode::Auto).unwrap();
    assert_eq!(signals.kind(), SignalKind::Timed);

    let dist = aggregate(&signals, &TimeGapStrategy::new());
    assert_eq!(dist.run_lengths(), &[1, 2]);
}

#[test]
fn test_extract_json_wrong_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(dir.path(), "capture.json", br#"{ "ampduReferences": [1, 1] }"#);

    assert!(matches!(
        extract_signals(&path, SignalMode::Time),
        Err(ParseError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_extract_json_mixed_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(
        dir.path(),
        "capture.json",
        br#"{ "timesReceivedInNanoseconds": [0], "ampduReferences": [1] }"#,
    );

    assert!(matches!(
        extract_signals(&path, SignalMode::Auto),
        Err(ParseError::Signal(AggregationError::MalformedSignal(_)))
    ));
}

#[test]
fn test_extract_missing_file() {
    assert!(matches!(
        extract_signals(Path::new("/nonexistent/capture.json"), SignalMode::Auto),
        Err(ParseError::InputNotFound(_))
    ));
}

#[test]
fn test_extract_pcap_group_ids() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![
        (0, 0, radiotap(Some(5))),
        (0, 10, radiotap(Some(5))),
        (0, 20, radiotap(None)),
        (0, 30, radiotap(None)),
        (0, 40, radiotap(Some(5))),
    ];
    let path = write_temp(
        dir.path(),
        "capture.pcap",
        &pcap(LINKTYPE_IEEE802_11_RADIOTAP, &records),
    );

    let signals = extract_signals(&path, SignalMode::Auto).unwrap();
    assert_eq!(signals.kind(), SignalKind::Grouped);

    let dist = aggregate(&signals, &TimeGapStrategy::new());
    assert_eq!(dist.run_lengths(), &[2, 2, 1]);
}

#[test]
fn test_extract_pcap_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![
        (1_700_000_000, 999_900, vec![0u8; 4]),
        (1_700_000_001, 100, vec![0u8; 4]),
        (1_700_000_001, 1_000, vec![0u8; 4]),
    ];
    let path = write_temp(dir.path(), "capture.pcap", &pcap(LINKTYPE_ETHERNET, &records));

    let signals = extract_signals(&path, SignalMode::Time).unwrap();
    let SignalSequence::Timed(times) = &signals else {
        panic!("expected timestamps");
    };
    let relative: Vec<f64> = times.iter().map(|t| t.arrival_time_us).collect();
    assert_eq!(relative, vec![0.0, 200.0, 1_100.0]);

    let dist = aggregate(&signals, &TimeGapStrategy::new());
    assert_eq!(dist.run_lengths(), &[2, 1]);
}

#[test]
fn test_extract_pcap_group_ids_need_radiotap() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(
        dir.path(),
        "capture.pcap",
        &pcap(LINKTYPE_ETHERNET, &[(0, 0, vec![0u8; 4])]),
    );

    assert!(matches!(
        extract_signals(&path, SignalMode::Group),
        Err(ParseError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_extract_pcap_auto_falls_back_to_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![
        (10, 0, vec![0u8; 4]),
        (10, 100, vec![0u8; 4]),
        (10, 900, vec![0u8; 4]),
    ];
    let path = write_temp(dir.path(), "capture.pcap", &pcap(LINKTYPE_ETHERNET, &records));

    let signals = extract_signals(&path, SignalMode::Auto).unwrap();
    assert_eq!(signals.kind(), SignalKind::Timed);

    let dist = aggregate(&signals, &TimeGapStrategy::new());
    assert_eq!(dist.run_lengths(), &[2, 1]);
}

#[test]
fn test_extract_pcap_truncated_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = pcap(LINKTYPE_IEEE802_11_RADIOTAP, &[(0, 0, radiotap(Some(1)))]);
    bytes.truncate(bytes.len() - 3);
    let path = write_temp(dir.path(), "capture.pcap", &bytes);

    assert!(matches!(
        extract_signals(&path, SignalMode::Group),
        Err(ParseError::InvalidFormat(_))
    ));
}

#[test]
fn test_extract_pcapng_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(dir.path(), "capture.pcapng", &[0x0a, 0x0d, 0x0d, 0x0a]);

    assert!(matches!(
        extract_signals(&path, SignalMode::Auto),
        Err(ParseError::UnsupportedFormat(_))
    ));
}
