use crate::parser::SignalMode;
use crate::plot::ChartConfig;
use crate::utils::config::{
    AnalysisConfig, DEFAULT_GAP_THRESHOLD_US, DEFAULT_MAX_SHOWN, DEFAULT_RUN_NAME,
};
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Capture to analyse (.json or .pcap)
    pub input: PathBuf,

    /// Existing directory receiving the output files
    pub output_dir: PathBuf,

    /// Run name, used as chart title and output file stem
    pub name: String,

    /// Last histogram column before the overflow column (None = no overflow column)
    pub max_shown: Option<i64>,

    /// Signal kind to extract
    pub signal_mode: SignalMode,

    /// Arrival gap that ends a burst, in microseconds
    pub gap_threshold_us: f64,

    pub write_svg: bool,
    pub write_html: bool,
    pub write_json: bool,

    /// Chart configuration
    pub chart_config: ChartConfig,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::from("."),
            name: DEFAULT_RUN_NAME.to_string(),
            max_shown: Some(DEFAULT_MAX_SHOWN),
            signal_mode: SignalMode::Auto,
            gap_threshold_us: DEFAULT_GAP_THRESHOLD_US,
            write_svg: true,
            write_html: true,
            write_json: true,
            chart_config: ChartConfig::default(),
            print_summary: false,
        }
    }
}

/// Values given on the command line. `None` falls back to the config file, then defaults.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOverrides {
    pub output_dir: Option<PathBuf>,
    pub name: Option<String>,
    pub max_shown: Option<i64>,
    pub no_max: bool,
    pub gap_threshold_us: Option<f64>,
}

impl AnalyzeArgs {
    /// Merge command-line values over config file values over defaults
    pub fn resolve(
        input: PathBuf,
        overrides: AnalyzeOverrides,
        config: Option<AnalysisConfig>,
    ) -> Self {
        let config = config.unwrap_or_default();
        let defaults = Self::default();

        let max_shown = if overrides.no_max || (config.no_max && overrides.max_shown.is_none()) {
            None
        } else {
            Some(
                overrides
                    .max_shown
                    .or(config.max_shown)
                    .unwrap_or(DEFAULT_MAX_SHOWN),
            )
        };

        let name = overrides
            .name
            .or(config.name)
            .unwrap_or(defaults.name);

        Self {
            input,
            output_dir: overrides
                .output_dir
                .or(config.output_dir.map(PathBuf::from))
                .unwrap_or(defaults.output_dir),
            chart_config: ChartConfig::new().with_title(name.clone()),
            name,
            max_shown,
            gap_threshold_us: overrides
                .gap_threshold_us
                .or(config.gap_threshold_us)
                .unwrap_or(defaults.gap_threshold_us),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let args = AnalyzeArgs::resolve(PathBuf::from("in.json"), AnalyzeOverrides::default(), None);

        assert_eq!(args.name, "unknown");
        assert_eq!(args.max_shown, Some(20));
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.gap_threshold_us, 400.0);
        assert_eq!(args.chart_config.title, "unknown");
    }

    #[test]
    fn test_resolve_cli_wins_over_config() {
        let config = AnalysisConfig {
            name: Some("from-file".to_string()),
            max_shown: Some(8),
            gap_threshold_us: Some(250.0),
            ..Default::default()
        };
        let overrides = AnalyzeOverrides {
            max_shown: Some(4),
            ..Default::default()
        };

        let args = AnalyzeArgs::resolve(PathBuf::from("in.json"), overrides, Some(config));

        assert_eq!(args.name, "from-file");
        assert_eq!(args.max_shown, Some(4));
        assert_eq!(args.gap_threshold_us, 250.0);
    }

    #[test]
    fn test_resolve_no_max() {
        let overrides = AnalyzeOverrides {
            max_shown: Some(4),
            no_max: true,
            ..Default::default()
        };
        let args = AnalyzeArgs::resolve(PathBuf::from("in.json"), overrides, None);
        assert_eq!(args.max_shown, None);

        let config = AnalysisConfig {
            no_max: true,
            ..Default::default()
        };
        let args = AnalyzeArgs::resolve(
            PathBuf::from("in.json"),
            AnalyzeOverrides::default(),
            Some(config),
        );
        assert_eq!(args.max_shown, None);
    }
}
