//! Output writers for reports and charts.
//!
//! This module handles writing data to disk in various formats:
//! - JSON aggregation reports
//! - SVG histogram charts
//! - Standalone HTML pages embedding the chart

pub mod html;
pub mod json;
pub mod svg;

// Re-export main functions
pub use html::{render_html_page, write_html};
pub use json::{read_report, write_report};
pub use svg::write_svg;

use crate::utils::error::OutputError;
use std::path::{Path, PathBuf};

/// Common path validation for output files
///
/// The parent directory must already exist; it is never created.
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(OutputError::DirectoryNotFound(parent.display().to_string()));
        }
    }

    Ok(())
}

/// Check that an output directory exists
pub fn ensure_output_dir(dir: &Path) -> Result<(), OutputError> {
    if !dir.is_dir() {
        return Err(OutputError::DirectoryNotFound(dir.display().to_string()));
    }
    Ok(())
}

/// `{dir}/{name}.{extension}`
pub fn output_file_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, extension))
}
