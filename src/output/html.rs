//! Standalone HTML page embedding the histogram chart.

use super::validate_path;
use crate::plot::escape_xml;
use crate::utils::error::OutputError;
use log::info;
use std::path::Path;

/// Wrap an SVG chart into a self-contained HTML document
pub fn render_html_page(title: &str, svg_content: &str) -> String {
    let title = escape_xml(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  html, body {{ margin: 0; height: 100%; background: #fafafa; }}
  .chart {{ display: flex; justify-content: center; align-items: center; height: 100%; }}
  .chart svg {{ max-width: 100%; height: auto; }}
</style>
</head>
<body>
<div class="chart">
{svg_content}
</div>
</body>
</html>
"#
    )
}

/// Write the chart as an HTML page
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` / `OutputError::DirectoryNotFound` - bad destination
pub fn write_html(
    title: &str,
    svg_content: &str,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing HTML to: {}", output_path.display());
    validate_path(output_path)?;

    let page = render_html_page(title, svg_content);
    std::fs::write(output_path, &page)?;

    info!("HTML written successfully ({} bytes)", page.len());
    Ok(())
}
