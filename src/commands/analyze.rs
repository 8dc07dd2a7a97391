//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Extracts per-packet signals from the capture
//! 2. Detects aggregation bursts
//! 3. Bins the run-lengths into histogram buckets
//! 4. Renders the chart
//! 5. Writes output files

use super::models::AnalyzeArgs;
use crate::aggregator::{aggregate, bin, validate_max_shown, TimeGapStrategy};
use crate::output::{ensure_output_dir, output_file_path, write_html, write_report, write_svg};
use crate::parser::{extract_signals, to_report};
use crate::plot::{generate_histogram_svg, generate_text_summary};
use crate::utils::error::AggregationError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Paths of the files written, in SVG, HTML, JSON order
///
/// # Errors
/// * Missing or unreadable capture
/// * Empty capture (no packets to aggregate)
/// * Missing output directory or file write errors
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<Vec<PathBuf>> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input.display());

    // Fail before parsing anything if the outputs cannot be written
    if args.write_svg || args.write_html || args.write_json {
        ensure_output_dir(&args.output_dir).context("Invalid output directory")?;
    }

    // Step 1: Extract signals
    info!("Step 1/5: Extracting packet signals...");
    let signals = extract_signals(&args.input, args.signal_mode)
        .with_context(|| format!("Failed to read capture {}", args.input.display()))?;

    if signals.is_empty() {
        return Err(AggregationError::EmptySignals)
            .with_context(|| format!("Capture {} holds no packets", args.input.display()));
    }

    // Step 2: Detect bursts
    info!("Step 2/5: Detecting aggregation bursts from {}...", signals.kind());
    let time_gap = TimeGapStrategy::with_threshold(args.gap_threshold_us)
        .context("Invalid gap threshold")?;
    let distribution = aggregate(&signals, &time_gap);

    info!("Distribution: {}", distribution.summary());

    // Step 3: Bin
    info!("Step 3/5: Binning run lengths...");
    let histogram = bin(&distribution, args.max_shown).context("Failed to bin run lengths")?;

    debug!(
        "Histogram: {} buckets, overflow {:?}",
        histogram.len(),
        histogram.overflow().map(|b| b.count)
    );

    // Step 4: Render chart
    let svg_content = if args.write_svg || args.write_html {
        info!("Step 4/5: Rendering histogram chart...");
        Some(
            generate_histogram_svg(&histogram, &distribution, Some(&args.chart_config))
                .context("Failed to render histogram")?,
        )
    } else {
        info!("Step 4/5: Skipping chart rendering (not requested)");
        None
    };

    // Step 5: Write outputs
    info!("Step 5/5: Writing output files...");
    let mut written = Vec::new();

    if let Some(svg) = &svg_content {
        if args.write_svg {
            let path = output_file_path(&args.output_dir, &args.name, "svg");
            write_svg(svg, &path).context("Failed to write SVG chart")?;
            info!("✓ Saved {}", path.display());
            written.push(path);
        }

        if args.write_html {
            let path = output_file_path(&args.output_dir, &args.name, "html");
            write_html(&args.name, svg, &path).context("Failed to write HTML page")?;
            info!("✓ Saved {}", path.display());
            written.push(path);
        }
    }

    if args.write_json {
        let report = to_report(
            &args.name,
            &args.input.display().to_string(),
            signals.kind().strategy_name(),
            &distribution,
            &histogram,
        )
        .context("Failed to build report")?;

        let path = output_file_path(&args.output_dir, &args.name, "json");
        write_report(&report, &path).context("Failed to write JSON report")?;
        info!("✓ Saved {}", path.display());
        written.push(path);
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("AGGREGATION SUMMARY: {}", args.name);
        println!("{}", "=".repeat(80));
        println!("Capture:  {}", args.input.display());
        println!("Strategy: {}", signals.kind().strategy_name());
        println!("\n{}", generate_text_summary(&histogram, &distribution));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(written)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input file cannot be empty");
    }

    if args.name.is_empty() {
        anyhow::bail!("Name cannot be empty");
    }

    if args.name.contains(['/', '\\']) {
        anyhow::bail!("Name is used as a file name and cannot contain path separators");
    }

    if let Some(max_shown) = args.max_shown {
        validate_max_shown(max_shown).context("The value of -m or --max should be greater than 0")?;
    }

    TimeGapStrategy::with_threshold(args.gap_threshold_us).context("Invalid --gap-us value")?;

    if !(args.write_svg || args.write_html || args.write_json || args.print_summary) {
        anyhow::bail!("Nothing to do: every output is disabled");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_args() -> AnalyzeArgs {
        AnalyzeArgs {
            input: PathBuf::from("capture.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&valid_args()).is_ok());
    }

    #[test]
    fn test_validate_args_max_shown_zero() {
        let args = AnalyzeArgs {
            max_shown: Some(0),
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_no_max() {
        let args = AnalyzeArgs {
            max_shown: None,
            ..valid_args()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_name_with_separator() {
        let args = AnalyzeArgs {
            name: "../escape".to_string(),
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_nothing_to_do() {
        let args = AnalyzeArgs {
            write_svg: false,
            write_html: false,
            write_json: false,
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }
}
