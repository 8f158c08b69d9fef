//! HTML renderer
//!
//! One self-contained file: inline styles, summary badges, a requirement
//! table per category. No external assets so the file can be attached to a
//! CI run or opened from disk.

use sitecheck_common::RunReport;

pub struct HtmlRenderer;

const STYLE: &str = r#"
    body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 2rem auto; max-width: 60rem; color: #1f2430; }
    h1 { border-bottom: 2px solid #e3e6ec; padding-bottom: .4rem; }
    .meta { color: #5a6172; margin-bottom: 1.5rem; }
    .badge { display: inline-block; padding: .2rem .6rem; border-radius: .4rem; font-weight: 600; }
    .badge.pass { background: #d9f2e1; color: #176639; }
    .badge.fail { background: #fbdcdc; color: #8f1d1d; }
    table { border-collapse: collapse; width: 100%; margin-bottom: 1.5rem; }
    th, td { border: 1px solid #e3e6ec; padding: .4rem .6rem; text-align: left; font-size: .92rem; }
    th { background: #f5f6f9; }
    tr.failed td { background: #fff6f6; }
    .details { color: #5a6172; }
"#;

impl HtmlRenderer {
    pub fn render(report: &RunReport) -> String {
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<title>Site verification report</title>\n");
        out.push_str(&format!("<style>{}</style>\n", STYLE));
        out.push_str("</head>\n<body>\n");

        out.push_str("<h1>Site verification report</h1>\n");

        let (badge_class, badge_text) = if report.all_passed() {
            ("pass", "PASS")
        } else {
            ("fail", "FAIL")
        };
        out.push_str(&format!(
            "<p><span class=\"badge {}\">{}</span> {} of {} checks passed, {} failed</p>\n",
            badge_class,
            badge_text,
            report.summary.passed,
            report.summary.total,
            report.summary.failed,
        ));

        out.push_str(&format!(
            "<p class=\"meta\">Site: {} · Browser: {} · Started: {} · Duration: {} ms</p>\n",
            escape(&report.site),
            escape(&report.browser),
            escape(&report.started_at),
            report.duration_ms,
        ));

        for category in &report.categories {
            out.push_str(&format!(
                "<h2>{} ({}/{} passed)</h2>\n",
                escape(&category.category.to_string()),
                category.passed,
                category.total
            ));
            out.push_str("<table>\n<tr><th>Requirement</th><th>Check</th><th>Viewport</th><th>Status</th><th>Details</th></tr>\n");

            for record in report.records.iter().filter(|r| r.category == category.category) {
                out.push_str(&format!(
                    "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"details\">{}</td></tr>\n",
                    if record.passed { "" } else { " class=\"failed\"" },
                    escape(&record.requirement),
                    escape(&record.name),
                    escape(&record.viewport),
                    if record.passed { "✅" } else { "❌" },
                    escape(&record.details),
                ));
            }
            out.push_str("</table>\n");
        }

        out.push_str("</body>\n</html>\n");
        out
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn test_document_structure() {
        let output = HtmlRenderer::render(&sample_report());

        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("<style>"));
        assert!(output.contains("</html>"));
    }

    #[test]
    fn test_fail_badge_and_row_highlight() {
        let output = HtmlRenderer::render(&sample_report());

        assert!(output.contains("badge fail"));
        assert!(output.contains("class=\"failed\""));
        assert!(output.contains("3 of 4 checks passed, 1 failed"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
