//! Histogram chart rendering.
//!
//! This module converts a binned distribution into an SVG bar chart
//! and a terminal text summary.

pub mod generator;

// Re-export main types
pub use generator::{escape_xml, generate_histogram_svg, generate_text_summary, ChartConfig};
