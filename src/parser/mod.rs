//! Capture parsing and schema definitions.
//!
//! This module handles:
//! - Reading JSON capture exports and classic pcap files
//! - Extracting per-packet signals (timestamps or A-MPDU group ids)
//! - Defining the output report schema

pub mod capture_json;
pub mod pcap;
pub mod schema;
pub mod signal;

// Re-export main types
pub use capture_json::parse_capture_json;
pub use pcap::{ampdu_reference, parse_pcap, read_header, LINKTYPE_IEEE802_11_RADIOTAP};
pub use schema::{to_report, AggregationReport, BucketCount, HistogramSummary};
pub use signal::{GroupedSignal, Signal, SignalKind, SignalSequence, TimedSignal};

use crate::utils::error::ParseError;
use log::{debug, info};
use std::io::ErrorKind;
use std::path::Path;

/// Which signal to extract from a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SignalMode {
    /// Whatever the capture provides (group ids for radiotap pcap files, else timestamps)
    #[default]
    Auto,
    /// Arrival timestamps, time-gap detection
    Time,
    /// A-MPDU group identifiers
    Group,
}

/// Supported capture containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Pcap,
}

impl InputFormat {
    /// Detect the container from the file extension
    ///
    /// # Errors
    /// * `ParseError::UnsupportedFormat` - anything but `.json` and `.pcap`
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Ok(InputFormat::Json),
            Some("pcap") => Ok(InputFormat::Pcap),
            Some("pcapng") => Err(ParseError::UnsupportedFormat(format!(
                "{}: PCAPNG captures are not supported; convert to classic pcap",
                path.display()
            ))),
            _ => Err(ParseError::UnsupportedFormat(format!(
                "{}: supported types are .json and .pcap",
                path.display()
            ))),
        }
    }
}

/// Read a capture file and extract its signals
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `path` - `.json` export or `.pcap` capture
/// * `mode` - Signal kind to extract
///
/// # Errors
/// * `ParseError::InputNotFound` - file does not exist
/// * `ParseError::UnsupportedFormat` - unknown extension, or mode not available for this capture
/// * `ParseError::InvalidFormat` - corrupt content
pub fn extract_signals(path: &Path, mode: SignalMode) -> Result<SignalSequence, ParseError> {
    let format = InputFormat::from_path(path)?;
    info!("Reading {:?} capture: {}", format, path.display());

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ParseError::InputNotFound(path.display().to_string()),
        _ => ParseError::IoError(e),
    })?;

    let sequence = match format {
        InputFormat::Json => {
            let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
            let sequence = parse_capture_json(&raw)?;
            ensure_mode(&sequence, mode)?;
            sequence
        }
        InputFormat::Pcap => {
            let kind = match mode {
                SignalMode::Group => SignalKind::Grouped,
                SignalMode::Time => SignalKind::Timed,
                SignalMode::Auto => {
                    let header = read_header(&bytes)?;
                    if header.link_type == LINKTYPE_IEEE802_11_RADIOTAP {
                        SignalKind::Grouped
                    } else {
                        info!(
                            "Link type {} has no radiotap header, using arrival timestamps",
                            header.link_type
                        );
                        SignalKind::Timed
                    }
                }
            };
            parse_pcap(&bytes, kind)?
        }
    };

    debug!("Extracted {} {}", sequence.len(), sequence.kind());
    Ok(sequence)
}

fn ensure_mode(sequence: &SignalSequence, mode: SignalMode) -> Result<(), ParseError> {
    let requested = match mode {
        SignalMode::Auto => return Ok(()),
        SignalMode::Time => SignalKind::Timed,
        SignalMode::Group => SignalKind::Grouped,
    };

    if sequence.kind() != requested {
        return Err(ParseError::UnsupportedFormat(format!(
            "capture provides {} but {} were requested",
            sequence.kind(),
            requested
        )));
    }
    Ok(())
}
