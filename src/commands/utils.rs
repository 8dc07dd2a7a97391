use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)?;

    let binned: u64 = report.histogram.buckets.iter().map(|b| b.count).sum();
    let summed: u64 = report.run_lengths.iter().sum();

    if summed != report.total_packets {
        anyhow::bail!(
            "Run lengths sum to {} but total_packets is {}",
            summed,
            report.total_packets
        );
    }
    if binned != report.run_lengths.len() as u64 {
        anyhow::bail!(
            "Histogram counts sum to {} but the report holds {} bursts",
            binned,
            report.run_lengths.len()
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Name: {}", report.name);
    println!("  Source: {}", report.source);
    println!("  Strategy: {}", report.strategy);
    println!("  Bursts: {}", report.run_lengths.len());
    println!("  Total Packets: {}", report.total_packets);
    println!("  Average Aggregation: {:.2}", report.mean_run_length);
    println!("  Buckets: {}", report.histogram.buckets.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Aggregation Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  name: string             - Run name");
        println!("  source: string           - Capture file analysed");
        println!("  strategy: string         - 'time-gap' or 'group-id'");
        println!("  run_lengths: array       - Packets per burst, detection order");
        println!("  total_packets: number    - Sum of run lengths");
        println!("  mean_run_length: number  - Mean packets per burst");
        println!("  histogram: object        - Bucketed counts");
        println!("    max_shown: number?     - Last exact bucket (absent = auto range)");
        println!("    buckets: array         - {{ label, count }}, overflow label 'N+'");
        println!("  generated_at: string     - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Aggregation Dist v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Frame aggregation histograms from wireless packet captures.");
}
