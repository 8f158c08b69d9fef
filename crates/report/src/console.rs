//! Console renderer
//!
//! Printed at the end of every run: one row per check, then the totals.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use sitecheck_common::RunReport;

pub struct ConsoleRenderer;

impl ConsoleRenderer {
    pub fn render(report: &RunReport) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec!["Requirement", "Check", "Viewport", "Status", "Details"]);

        for record in &report.records {
            table.add_row(vec![
                record.requirement.clone(),
                record.name.clone(),
                record.viewport.clone(),
                if record.passed { "✓".to_string() } else { "✗".to_string() },
                record.details.clone(),
            ]);
        }

        format!(
            "{table}\n{}: {} passed, {} failed, {} total ({} ms)\n",
            if report.all_passed() { "PASS" } else { "FAIL" },
            report.summary.passed,
            report.summary.failed,
            report.summary.total,
            report.duration_ms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn test_console_summary_line() {
        let output = ConsoleRenderer::render(&sample_report());

        assert!(output.contains("FAIL: 3 passed, 1 failed, 4 total"));
        assert!(output.contains("CAR-01"));
        assert!(output.contains("✗"));
    }

    #[test]
    fn test_console_lists_every_record() {
        let report = sample_report();
        let output = ConsoleRenderer::render(&report);

        for record in &report.records {
            assert!(output.contains(&record.requirement));
        }
    }
}
