//! Aggregation Dist CLI
//!
//! Computes the frame aggregation distribution of a wireless capture
//! and renders it as an histogram (SVG, HTML and JSON report).

use aggregation_dist::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs, AnalyzeOverrides,
};
use aggregation_dist::parser::SignalMode;
use aggregation_dist::utils::config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

/// Aggregation Dist - frame aggregation histograms for wireless captures
#[derive(Parser, Debug)]
#[command(name = "aggregation-dist")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the aggregation distribution of a capture (.json or .pcap)
    Analyze {
        /// Capture file to analyse
        input: PathBuf,

        /// Existing directory in which the output files are saved
        #[arg(short, long, env = "AGGDIST_OUTPUT_DIR")]
        output: Option<PathBuf>,

        /// Name of the graph, also used to name the output files
        #[arg(short, long)]
        name: Option<String>,

        /// Value of the last aggregation column on the graph
        #[arg(short, long, env = "AGGDIST_MAX_SHOWN", allow_hyphen_values = true)]
        max: Option<i64>,

        /// Do not group large aggregations into an overflow column
        #[arg(short = 'u', long)]
        no_max: bool,

        /// Signal used to detect bursts
        #[arg(long, value_enum, default_value_t = SignalMode::Auto)]
        signal: SignalMode,

        /// Arrival gap ending a burst, in microseconds (timestamp captures)
        #[arg(long)]
        gap_us: Option<f64>,

        /// TOML file with default analysis settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Chart width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,

        /// Chart height in pixels
        #[arg(long, default_value = "600")]
        height: usize,

        /// Skip the SVG chart
        #[arg(long)]
        no_svg: bool,

        /// Skip the HTML page
        #[arg(long)]
        no_html: bool,

        /// Skip the JSON report
        #[arg(long)]
        no_json: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            output,
            name,
            max,
            no_max,
            signal,
            gap_us,
            config,
            width,
            height,
            no_svg,
            no_html,
            no_json,
            summary,
        } => {
            let file_config = config
                .map(|path| {
                    load_config(&path)
                        .with_context(|| format!("Failed to load config {}", path.display()))
                })
                .transpose()?;

            let overrides = AnalyzeOverrides {
                output_dir: output,
                name,
                max_shown: max,
                no_max,
                gap_threshold_us: gap_us,
            };

            let mut args = AnalyzeArgs::resolve(input, overrides, file_config);
            args.signal_mode = signal;
            args.chart_config = args.chart_config.with_size(width, height);
            args.write_svg = !no_svg;
            args.write_html = !no_html;
            args.write_json = !no_json;
            args.print_summary = summary;

            // Validate args first
            validate_args(&args)?;

            execute_analyze(&args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
