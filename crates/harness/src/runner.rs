//! Sequential scenario runner
//!
//! Orchestrates a run: probe the target site, execute each scenario under
//! each of its viewports in order, fold step outcomes and visual diffs into
//! check records, and derive the final report. One scenario at a time, one
//! browser page at a time.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{error, info};

use sitecheck_common::{CheckRecord, Collector, RunReport, Scenario, StepOutcome};

use crate::browser::{BrowserKind, DriverConfig, PlaywrightDriver};
use crate::error::{HarnessError, HarnessResult};
use crate::target::Target;
use crate::visual::{VisualComparer, VisualConfig};

/// Configuration for a run
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub base_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub output_dir: PathBuf,
    /// How long to wait for the site to answer before giving up
    pub startup_timeout: Duration,
    /// Visual comparison settings; `None` disables screenshot comparison
    pub visual: Option<VisualConfig>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            browser: BrowserKind::Chromium,
            headless: true,
            output_dir: PathBuf::from("test-results"),
            startup_timeout: Duration::from_secs(30),
            visual: Some(VisualConfig::default()),
        }
    }
}

/// Runs scenarios serially and collects check records
pub struct ScenarioRunner {
    config: RunnerConfig,
}

impl ScenarioRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run every scenario in order and return the finished report
    pub async fn run(&self, scenarios: &[Scenario]) -> HarnessResult<RunReport> {
        let target = Target::new(self.config.base_url.clone());
        target.wait_ready(self.config.startup_timeout).await?;

        PlaywrightDriver::ensure_installed()?;
        let driver = PlaywrightDriver::new(DriverConfig {
            base_url: self.config.base_url.clone(),
            browser: self.config.browser,
            headless: self.config.headless,
            screenshot_dir: self.config.output_dir.join("screenshots"),
        })?;

        let comparer = match &self.config.visual {
            Some(visual) => Some(VisualComparer::new(visual.clone())?),
            None => None,
        };

        let mut collector = Collector::new();

        info!("running {} scenario(s) against {}", scenarios.len(), self.config.base_url);

        for scenario in scenarios {
            for viewport in &scenario.viewports {
                let timestamp = Utc::now().to_rfc3339();
                let started = Instant::now();
                let shot_prefix = format!("{}-{}-", scenario.id.to_lowercase(), viewport);

                let record = match driver.run(*viewport, &scenario.steps, &shot_prefix).await {
                    Ok(outcomes) => {
                        let (mut passed, mut details) =
                            summarize_outcomes(scenario.steps.len(), &outcomes);
                        let screenshots: Vec<String> =
                            outcomes.iter().filter_map(|o| o.screenshot.clone()).collect();

                        if passed {
                            if let Some(comparer) = &comparer {
                                if let Some(mismatch) =
                                    compare_screenshots(comparer, &screenshots)
                                {
                                    passed = false;
                                    details = mismatch;
                                }
                            }
                        }

                        CheckRecord {
                            name: scenario.title.clone(),
                            requirement: scenario.id.clone(),
                            category: scenario.category.clone(),
                            viewport: viewport.to_string(),
                            passed,
                            details,
                            timestamp,
                            duration_ms: started.elapsed().as_millis() as u64,
                            steps: outcomes,
                            screenshots,
                        }
                    }
                    // Harness-level failure: the error message becomes the
                    // failed record's details, and the run continues.
                    Err(e) => CheckRecord {
                        name: scenario.title.clone(),
                        requirement: scenario.id.clone(),
                        category: scenario.category.clone(),
                        viewport: viewport.to_string(),
                        passed: false,
                        details: e.to_string(),
                        timestamp,
                        duration_ms: started.elapsed().as_millis() as u64,
                        steps: vec![],
                        screenshots: vec![],
                    },
                };

                if record.passed {
                    info!("✓ {} [{}] ({} ms)", record.requirement, record.viewport, record.duration_ms);
                } else {
                    error!("✗ {} [{}] - {}", record.requirement, record.viewport, record.details);
                }

                collector.push(record);
            }
        }

        let report = collector.finish(&self.config.base_url, self.config.browser.as_str());

        info!(
            "checks: {} passed, {} failed ({} ms)",
            report.summary.passed, report.summary.failed, report.duration_ms
        );

        Ok(report)
    }
}

/// Fold step outcomes into the record-level verdict and detail text.
///
/// A scenario passes when every step ran and passed; a failing step ends
/// the scenario early, so a short outcome list means failure too.
fn summarize_outcomes(expected_steps: usize, outcomes: &[StepOutcome]) -> (bool, String) {
    if let Some(failed) = outcomes.iter().find(|o| !o.passed) {
        let detail = failed.detail.as_deref().unwrap_or("step failed");
        return (false, format!("{}: {}", failed.step, detail));
    }

    if outcomes.len() < expected_steps {
        return (
            false,
            format!("only {} of {} steps ran", outcomes.len(), expected_steps),
        );
    }

    (true, format!("all {} steps passed", outcomes.len()))
}

/// Compare every screenshot of a record; returns the first mismatch detail.
///
/// A missing baseline is not a failure (first run); other comparison errors
/// are.
fn compare_screenshots(comparer: &VisualComparer, screenshots: &[String]) -> Option<String> {
    for path in screenshots {
        let name = PathBuf::from(path);
        let name = name.file_stem()?.to_string_lossy().to_string();

        match comparer.compare(&name) {
            Ok(diff) if !diff.matches => {
                return Some(format!(
                    "visual mismatch in '{}': {:.2}% pixels differ",
                    name, diff.diff_percent
                ));
            }
            Ok(_) => {}
            Err(HarnessError::BaselineNotFound(_)) => {
                info!("no baseline for '{}' yet - run with --update-baselines to create it", name);
            }
            Err(e) => {
                return Some(format!("visual comparison error for '{}': {}", name, e));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(step: &str, passed: bool, detail: Option<&str>) -> StepOutcome {
        StepOutcome {
            step: step.to_string(),
            passed,
            duration_ms: 5,
            detail: detail.map(String::from),
            screenshot: None,
        }
    }

    #[test]
    fn test_all_steps_passed() {
        let outcomes = vec![outcome("navigate:/", true, None), outcome("expect:.carousel", true, None)];
        let (passed, details) = summarize_outcomes(2, &outcomes);
        assert!(passed);
        assert_eq!(details, "all 2 steps passed");
    }

    #[test]
    fn test_failing_step_carries_its_detail() {
        let outcomes = vec![
            outcome("navigate:/", true, None),
            outcome("expect:.carousel", false, Some("element not visible: .carousel")),
        ];
        let (passed, details) = summarize_outcomes(3, &outcomes);
        assert!(!passed);
        assert_eq!(details, "expect:.carousel: element not visible: .carousel");
    }

    #[test]
    fn test_truncated_outcomes_fail() {
        let outcomes = vec![outcome("navigate:/", true, None)];
        let (passed, details) = summarize_outcomes(4, &outcomes);
        assert!(!passed);
        assert_eq!(details, "only 1 of 4 steps ran");
    }

    #[test]
    fn test_empty_outcomes_fail_for_nonempty_scenario() {
        let (passed, _) = summarize_outcomes(2, &[]);
        assert!(!passed);
    }

    #[test]
    fn test_runner_config_default() {
        let config = RunnerConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.browser, BrowserKind::Chromium);
        assert!(config.visual.is_some());
    }
}
