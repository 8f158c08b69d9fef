//! JSON renderer

use sitecheck_common::{Result, RunReport};

/// Serializes a run report as JSON
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn render(report: &RunReport, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;
    use sitecheck_common::RunReport;

    #[test]
    fn test_compact_and_pretty() {
        let report = sample_report();

        let compact = JsonRenderer::render(&report, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(compact.contains("\"site\":\"http://localhost:3000\""));

        let pretty = JsonRenderer::render(&report, true).unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_roundtrip() {
        let report = sample_report();
        let json = JsonRenderer::render(&report, false).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.summary, report.summary);
        assert_eq!(parsed.browser, "chromium");
        assert_eq!(parsed.categories.len(), 3);
    }
}
