//! Check result records and run summaries
//!
//! The only persistent data model in sitecheck: one record per scenario per
//! viewport, accumulated in execution order, summarized once at the end of
//! the run. Every count in a summary is derived from the record list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scenario::Category;

/// Outcome of a single executed step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Step label, e.g. `expect:.carousel`
    pub step: String,
    pub passed: bool,
    pub duration_ms: u64,
    /// Failure detail when the step did not pass
    #[serde(default)]
    pub detail: Option<String>,
    /// Screenshot file written by this step, if any
    #[serde(default)]
    pub screenshot: Option<String>,
}

/// Result of one scenario under one viewport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRecord {
    /// Requirement title
    pub name: String,
    /// Requirement identifier (scenario id)
    pub requirement: String,
    pub category: Category,
    /// Viewport label, e.g. `1280x720`
    pub viewport: String,
    pub passed: bool,
    /// Free-text detail: first failure reason, or a pass note
    pub details: String,
    /// RFC 3339 timestamp taken when the check started
    pub timestamp: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub steps: Vec<StepOutcome>,
    #[serde(default)]
    pub screenshots: Vec<String>,
}

/// Pass/fail counts over a set of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Pass/fail counts for a single category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// A complete run, ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    /// Base URL the checks ran against
    pub site: String,
    pub browser: String,
    pub started_at: String,
    pub finished_at: String,
    pub duration_ms: u64,
    pub summary: RunSummary,
    pub categories: Vec<CategorySummary>,
    pub records: Vec<CheckRecord>,
}

impl RunReport {
    /// Records that failed, in execution order
    pub fn failures(&self) -> impl Iterator<Item = &CheckRecord> {
        self.records.iter().filter(|r| !r.passed)
    }

    /// Whether every record passed
    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }
}

/// Accumulates records during a run and derives the final report
pub struct Collector {
    records: Vec<CheckRecord>,
    started_at: DateTime<Utc>,
}

impl Collector {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Append a record in execution order
    pub fn push(&mut self, record: CheckRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finish the run: compute every summary count from the record list.
    ///
    /// Categories appear in first-seen order.
    pub fn finish(self, site: &str, browser: &str) -> RunReport {
        let finished_at = Utc::now();
        let duration_ms = (finished_at - self.started_at).num_milliseconds().max(0) as u64;

        let passed = self.records.iter().filter(|r| r.passed).count();
        let summary = RunSummary {
            total: self.records.len(),
            passed,
            failed: self.records.len() - passed,
        };

        let mut categories: Vec<CategorySummary> = Vec::new();
        for record in &self.records {
            let idx = match categories.iter().position(|c| c.category == record.category) {
                Some(idx) => idx,
                None => {
                    categories.push(CategorySummary {
                        category: record.category.clone(),
                        total: 0,
                        passed: 0,
                        failed: 0,
                    });
                    categories.len() - 1
                }
            };
            let entry = &mut categories[idx];
            entry.total += 1;
            if record.passed {
                entry.passed += 1;
            } else {
                entry.failed += 1;
            }
        }

        RunReport {
            run_id: Uuid::new_v4(),
            site: site.to_string(),
            browser: browser.to_string(),
            started_at: self.started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            duration_ms,
            summary,
            categories,
            records: self.records,
        }
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: Category, passed: bool) -> CheckRecord {
        CheckRecord {
            name: format!("check {}", id),
            requirement: id.to_string(),
            category,
            viewport: "1280x720".to_string(),
            passed,
            details: if passed { "ok".into() } else { "element not visible".into() },
            timestamp: Utc::now().to_rfc3339(),
            duration_ms: 12,
            steps: vec![],
            screenshots: vec![],
        }
    }

    #[test]
    fn test_summary_counts_match_records() {
        let mut collector = Collector::new();
        collector.push(record("CAR-01", Category::Carousel, true));
        collector.push(record("CAR-02", Category::Carousel, false));
        collector.push(record("VID-01", Category::Video, true));
        collector.push(record("BOOK-01", Category::BookingForm, false));

        let report = collector.finish("http://localhost:3000", "chromium");

        assert_eq!(report.summary.total, report.records.len());
        assert_eq!(report.summary.total, report.summary.passed + report.summary.failed);
        assert_eq!(report.summary.passed, 2);
        assert_eq!(report.summary.failed, 2);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_category_counts_match_filtered_records() {
        let mut collector = Collector::new();
        collector.push(record("CAR-01", Category::Carousel, true));
        collector.push(record("CAR-02", Category::Carousel, true));
        collector.push(record("CAR-03", Category::Carousel, false));
        collector.push(record("VID-01", Category::Video, true));

        let report = collector.finish("http://localhost:3000", "chromium");

        for summary in &report.categories {
            let in_category: Vec<_> = report
                .records
                .iter()
                .filter(|r| r.category == summary.category)
                .collect();
            assert_eq!(summary.total, in_category.len());
            assert_eq!(summary.passed + summary.failed, in_category.len());
        }
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let mut collector = Collector::new();
        collector.push(record("VID-01", Category::Video, true));
        collector.push(record("CAR-01", Category::Carousel, true));
        collector.push(record("VID-02", Category::Video, true));

        let report = collector.finish("http://localhost:3000", "chromium");

        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.categories[0].category, Category::Video);
        assert_eq!(report.categories[1].category, Category::Carousel);
    }

    #[test]
    fn test_records_preserve_execution_order() {
        let mut collector = Collector::new();
        for i in 0..5 {
            collector.push(record(&format!("CAR-{:02}", i), Category::Carousel, true));
        }

        let report = collector.finish("http://localhost:3000", "chromium");
        let ids: Vec<_> = report.records.iter().map(|r| r.requirement.as_str()).collect();
        assert_eq!(ids, vec!["CAR-00", "CAR-01", "CAR-02", "CAR-03", "CAR-04"]);
    }

    #[test]
    fn test_empty_run_report() {
        let report = Collector::new().finish("http://localhost:3000", "chromium");
        assert_eq!(report.summary, RunSummary { total: 0, passed: 0, failed: 0 });
        assert!(report.categories.is_empty());
        assert!(report.all_passed());
    }

    #[test]
    fn test_report_json_roundtrip() {
        let mut collector = Collector::new();
        collector.push(record("CAR-01", Category::Carousel, false));
        let report = collector.finish("http://localhost:4000", "firefox");

        let json = serde_json::to_string(&report).unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.site, "http://localhost:4000");
        assert_eq!(parsed.summary.failed, 1);
        assert_eq!(parsed.records[0].details, "element not visible");
    }
}
