//! Aggregation Dist
//!
//! Frame aggregation distributions for wireless packet captures.
//!
//! A capture is reduced to per-packet signals (arrival timestamps or
//! A-MPDU group identifiers), split into aggregation bursts, and the
//! burst sizes are binned into a histogram with an optional overflow
//! column.
//!
//! ## Getting Started
//!
//! ```bash
//! aggregation-dist analyze capture.pcap -o plots -n office -m 20
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod plot;
pub mod utils;
