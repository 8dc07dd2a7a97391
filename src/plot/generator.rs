//! SVG histogram generation.
//!
//! Hand-written SVG, no plotting dependency:
//! - one bar per bucket, overflow bucket drawn like the others
//! - occurrence count above every bar
//! - mean burst size and packet total in the top-left corner

use crate::aggregator::{Distribution, Histogram};
use crate::utils::error::PlotError;
use log::info;

const BAR_FILL: &str = "#304ffe";
const BAR_OPACITY: f64 = 0.5;
const BACKGROUND: &str = "#fafafa";
const GRID_LINES: u64 = 5;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 100.0;
const MARGIN_BOTTOM: f64 = 70.0;

/// Histogram chart configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Aggregation Distribution".to_string(),
            width: 1200,
            height: 600,
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Generate an SVG histogram chart
///
/// # Errors
/// * `PlotError::EmptyHistogram` - no buckets to draw
/// * `PlotError::Aggregation` - mean undefined for an empty distribution
pub fn generate_histogram_svg(
    histogram: &Histogram,
    distribution: &Distribution,
    config: Option<&ChartConfig>,
) -> Result<String, PlotError> {
    if histogram.is_empty() {
        return Err(PlotError::EmptyHistogram);
    }

    let config = config.cloned().unwrap_or_default();
    let mean = distribution.mean_run_length()?;
    info!("Generating histogram chart with {} buckets", histogram.len());

    let width = config.width as f64;
    let height = config.height as f64;
    let plot_width = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_height = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
    let baseline = MARGIN_TOP + plot_height;

    let bar_width = plot_width / histogram.len() as f64;
    // Leave headroom above the tallest bar for its count label
    let y_max = (histogram.max_count() as f64 * 1.1).max(1.0);
    let y_scale = plot_height / y_max;

    let mut svg = String::new();

    // Header
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        config.width, config.height, config.width, config.height
    ));
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        config.width, config.height, BACKGROUND
    ));
    svg.push_str(
        r#"<style>.bar:hover { opacity: 0.8; } text { font-family: sans-serif; }</style>"#,
    );

    // Title
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="28" font-size="18" text-anchor="middle" font-weight="bold">{}</text>"#,
        width / 2.0,
        escape_xml(&config.title)
    ));

    // Annotations
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="13">Average Aggregation: {:.2}</text>"#,
        MARGIN_LEFT + 10.0,
        MARGIN_TOP - 40.0,
        mean
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="13">Number of Received Packets: {}</text>"#,
        MARGIN_LEFT + 10.0,
        MARGIN_TOP - 20.0,
        distribution.total_packets()
    ));

    render_grid(&mut svg, y_max, y_scale, baseline, width);

    // Bars
    for (index, bucket) in histogram.buckets().iter().enumerate() {
        let x = MARGIN_LEFT + index as f64 * bar_width;
        let bar_height = bucket.count as f64 * y_scale;
        let y = baseline - bar_height;
        let center = x + bar_width / 2.0;

        svg.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{}" stroke="white" class="bar"><title>{}: {}</title></rect>"#,
            x, y, bar_width, bar_height, BAR_FILL, BAR_OPACITY, bucket.label, bucket.count
        ));
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="12" text-anchor="middle">{}</text>"#,
            center,
            y - 6.0,
            bucket.count
        ));
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="12" text-anchor="middle">{}</text>"#,
            center,
            baseline + 18.0,
            bucket.label
        ));
    }

    // Axes
    svg.push_str(&format!(
        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        MARGIN_LEFT,
        baseline,
        width - MARGIN_RIGHT,
        baseline
    ));
    svg.push_str(&format!(
        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, baseline
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle">Aggregation</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        height - 20.0
    ));
    svg.push_str(&format!(
        r#"<text x="20" y="{:.1}" font-size="14" text-anchor="middle" transform="rotate(-90 20 {:.1})">Number of Occurrences</text>"#,
        MARGIN_TOP + plot_height / 2.0,
        MARGIN_TOP + plot_height / 2.0
    ));

    svg.push_str("</svg>");

    info!("Histogram chart generated successfully ({} bytes)", svg.len());
    Ok(svg)
}

fn render_grid(out: &mut String, y_max: f64, y_scale: f64, baseline: f64, width: f64) {
    let step = ((y_max / GRID_LINES as f64).ceil() as u64).max(1);

    let mut value = 0;
    while (value as f64) <= y_max {
        let y = baseline - value as f64 * y_scale;
        out.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.2}" x2="{:.1}" y2="{:.2}" stroke="white" stroke-width="2"/>"#,
            MARGIN_LEFT,
            y,
            width - MARGIN_RIGHT,
            y
        ));
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.2}" font-size="11" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 8.0,
            y + 4.0,
            value
        ));
        value += step;
    }
}

/// Escape text placed inside SVG/HTML markup
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Create a text summary table of the histogram
pub fn generate_text_summary(histogram: &Histogram, distribution: &Distribution) -> String {
    let mut lines = Vec::new();
    let total = histogram.total().max(1);
    let max_count = histogram.max_count().max(1);

    lines.push("  AGGREGATION DISTRIBUTION".to_string());
    lines.push("  ┏━━━━━━━━━━━━┳━━━━━━━━━━━━┳━━━━━━━━━┳━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┓".to_string());
    lines.push(format!(
        "  ┃ {:<10} ┃ {:>10} ┃ {:>7} ┃ {:<52} ┃",
        "Burst size", "Count", "%", ""
    ));
    lines.push("  ┣━━━━━━━━━━━━╋━━━━━━━━━━━━╋━━━━━━━━━╋━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┫".to_string());

    for bucket in histogram.buckets() {
        let percentage = bucket.count as f64 / total as f64 * 100.0;
        let bar_width = (bucket.count * 50 / max_count) as usize;
        lines.push(format!(
            "  ┃ {:<10} ┃ {:>10} ┃ {:>6.1}% ┃ {:<52} ┃",
            bucket.label.to_string(),
            bucket.count,
            percentage,
            "█".repeat(bar_width)
        ));
    }

    lines.push("  ┗━━━━━━━━━━━━┻━━━━━━━━━━━━┻━━━━━━━━━┻━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".to_string());
    lines.push(String::new());

    match distribution.mean_run_length() {
        Ok(mean) => lines.push(format!("  Average Aggregation: {:.2}", mean)),
        Err(_) => lines.push("  Average Aggregation: n/a".to_string()),
    }
    lines.push(format!(
        "  Number of Received Packets: {}",
        distribution.total_packets()
    ));
    lines.push(format!("  Aggregation Bursts: {}", distribution.len()));

    lines.join("\n")
}
