//! Report rendering for sitecheck runs
//!
//! One [`Reporter`] facade over four renderers:
//!
//! - **JSON**: machine-readable, also the interchange format the `report`
//!   command re-renders from
//! - **Markdown**: summary plus per-category requirement tables
//! - **HTML**: self-contained single file with inline styles
//! - **Console**: table summary printed at the end of every run

mod console;
mod html;
mod json;
mod markdown;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use sitecheck_common::{Result, RunReport};

pub use console::ConsoleRenderer;
pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;

/// Output format for a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Json,
    Markdown,
    Html,
    Console,
}

impl ReportFormat {
    /// Conventional file name for this format under the output directory
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            ReportFormat::Json => Some("report.json"),
            ReportFormat::Markdown => Some("report.md"),
            ReportFormat::Html => Some("report.html"),
            ReportFormat::Console => None,
        }
    }
}

/// Renders run reports into one format
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Render the report as a string
    pub fn render(&self, report: &RunReport) -> Result<String> {
        match self.format {
            ReportFormat::Json => JsonRenderer::render(report, true),
            ReportFormat::Markdown => Ok(MarkdownRenderer::render(report)),
            ReportFormat::Html => Ok(HtmlRenderer::render(report)),
            ReportFormat::Console => Ok(ConsoleRenderer::render(report)),
        }
    }

    /// Render and write to a file
    pub fn write_to_file(&self, report: &RunReport, path: &Path) -> Result<()> {
        let output = self.render(report)?;
        fs::write(path, output)?;
        Ok(())
    }
}

/// Write the standard artifact set (JSON, Markdown, HTML) under a directory.
///
/// Existing artifacts are overwritten in place. Returns the written paths.
pub fn write_artifacts(report: &RunReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    for format in [ReportFormat::Json, ReportFormat::Markdown, ReportFormat::Html] {
        let file_name = format.file_name().expect("artifact formats have file names");
        let path = output_dir.join(file_name);
        Reporter::new(format).write_to_file(report, &path)?;
        written.push(path);
    }

    info!("report artifacts written to {}", output_dir.display());
    Ok(written)
}

/// Load a previously written JSON report for re-rendering
pub fn load_report(path: &Path) -> Result<RunReport> {
    let content = fs::read_to_string(path)?;
    let report = serde_json::from_str(&content)?;
    Ok(report)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use sitecheck_common::{Category, CheckRecord, Collector, RunReport};

    pub fn record(id: &str, category: Category, passed: bool) -> CheckRecord {
        CheckRecord {
            name: format!("Requirement {}", id),
            requirement: id.to_string(),
            category,
            viewport: "1280x720".to_string(),
            passed,
            details: if passed {
                "all 3 steps passed".to_string()
            } else {
                "expect:.carousel: element not visible: .carousel".to_string()
            },
            timestamp: "2026-08-06T12:00:00+00:00".to_string(),
            duration_ms: 420,
            steps: vec![],
            screenshots: vec![],
        }
    }

    pub fn sample_report() -> RunReport {
        let mut collector = Collector::new();
        collector.push(record("CAR-01", Category::Carousel, true));
        collector.push(record("CAR-02", Category::Carousel, false));
        collector.push(record("VID-01", Category::Video, true));
        collector.push(record("BOOK-01", Category::BookingForm, true));
        collector.finish("http://localhost:3000", "chromium")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_artifacts_creates_all_three() {
        let dir = tempfile::tempdir().unwrap();
        let report = fixtures::sample_report();

        let written = write_artifacts(&report, dir.path()).unwrap();

        assert_eq!(written.len(), 3);
        assert!(dir.path().join("report.json").exists());
        assert!(dir.path().join("report.md").exists());
        assert!(dir.path().join("report.html").exists());
    }

    #[test]
    fn test_json_artifact_roundtrips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let report = fixtures::sample_report();
        write_artifacts(&report, dir.path()).unwrap();

        let loaded = load_report(&dir.path().join("report.json")).unwrap();
        assert_eq!(loaded.summary, report.summary);
        assert_eq!(loaded.records.len(), report.records.len());
    }

    #[test]
    fn test_load_missing_report_is_an_error() {
        assert!(load_report(Path::new("/nonexistent/report.json")).is_err());
    }

    #[test]
    fn test_console_format_has_no_file_name() {
        assert!(ReportFormat::Console.file_name().is_none());
        assert_eq!(ReportFormat::Json.file_name(), Some("report.json"));
    }
}
