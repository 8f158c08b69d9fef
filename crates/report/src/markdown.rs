//! Markdown renderer
//!
//! Summary header, one requirement table per category, and a failure
//! section with details for anything that did not pass.

use sitecheck_common::RunReport;

pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn render(report: &RunReport) -> String {
        let mut out = String::new();

        out.push_str("# Site verification report\n\n");
        out.push_str(&format!("- **Site:** {}\n", report.site));
        out.push_str(&format!("- **Browser:** {}\n", report.browser));
        out.push_str(&format!("- **Started:** {}\n", report.started_at));
        out.push_str(&format!("- **Duration:** {} ms\n", report.duration_ms));
        out.push_str(&format!(
            "- **Result:** {} — {} of {} checks passed, {} failed\n\n",
            if report.all_passed() { "PASS" } else { "FAIL" },
            report.summary.passed,
            report.summary.total,
            report.summary.failed,
        ));

        for category in &report.categories {
            out.push_str(&format!(
                "## {} ({}/{} passed)\n\n",
                category.category, category.passed, category.total
            ));
            out.push_str("| Requirement | Check | Viewport | Status | Details |\n");
            out.push_str("|---|---|---|---|---|\n");

            for record in report.records.iter().filter(|r| r.category == category.category) {
                out.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    record.requirement,
                    escape_cell(&record.name),
                    record.viewport,
                    if record.passed { "✅" } else { "❌" },
                    escape_cell(&record.details),
                ));
            }
            out.push('\n');
        }

        let failures: Vec<_> = report.failures().collect();
        if !failures.is_empty() {
            out.push_str("## Failures\n\n");
            for record in failures {
                out.push_str(&format!(
                    "### {} — {} [{}]\n\n",
                    record.requirement, record.name, record.viewport
                ));
                out.push_str(&format!("- Detail: {}\n", record.details));
                out.push_str(&format!("- At: {}\n\n", record.timestamp));
            }
        }

        out
    }
}

/// Keep user-supplied text from breaking table rows
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
