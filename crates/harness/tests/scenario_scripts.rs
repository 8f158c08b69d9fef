//! Script generation over the whole built-in registry
//!
//! Drives the codegen path for every built-in scenario under every one of
//! its viewports, without needing node or a browser.

use sitecheck_harness::{BrowserKind, DriverConfig, PlaywrightDriver};

use sitecheck_common::Registry;

fn driver(screenshot_dir: &std::path::Path) -> PlaywrightDriver {
    PlaywrightDriver::new(DriverConfig {
        base_url: "http://localhost:3000".to_string(),
        browser: BrowserKind::Chromium,
        headless: true,
        screenshot_dir: screenshot_dir.to_path_buf(),
    })
    .unwrap()
}

#[test]
fn every_builtin_scenario_generates_a_runnable_script() {
    let dir = tempfile::tempdir().unwrap();
    let driver = driver(dir.path());

    for scenario in Registry::builtin().scenarios() {
        for viewport in &scenario.viewports {
            let prefix = format!("{}-{}-", scenario.id.to_lowercase(), viewport);
            let script = driver.script_for(*viewport, &scenario.steps, &prefix);

            assert!(
                script.contains("require('playwright')"),
                "{}: missing playwright import",
                scenario.id
            );
            assert!(
                script.contains("SITECHECK_RESULT"),
                "{}: missing result marker",
                scenario.id
            );
            assert!(
                script.contains("await browser.close();"),
                "{}: browser never closed",
                scenario.id
            );
            assert!(
                script.contains(&format!(
                    "viewport: {{ width: {}, height: {} }}",
                    viewport.width, viewport.height
                )),
                "{}: viewport not applied",
                scenario.id
            );

            // One wrapped step() call per scenario step
            let step_calls = script.matches("await step(").count();
            assert_eq!(
                step_calls,
                scenario.steps.len(),
                "{}: step count mismatch",
                scenario.id
            );

            // Generated code must be brace-balanced
            let opens = script.matches('{').count();
            let closes = script.matches('}').count();
            assert_eq!(opens, closes, "{}: unbalanced braces", scenario.id);
        }
    }
}

#[test]
fn screenshot_steps_are_namespaced_per_viewport() {
    let dir = tempfile::tempdir().unwrap();
    let driver = driver(dir.path());

    let registry = Registry::builtin();
    let scenario = registry.by_id("BOOK-06").unwrap();
    assert!(scenario.viewports.len() > 1);

    let mut paths = std::collections::HashSet::new();
    for viewport in &scenario.viewports {
        let prefix = format!("{}-{}-", scenario.id.to_lowercase(), viewport);
        let script = driver.script_for(*viewport, &scenario.steps, &prefix);

        let path_line = script
            .lines()
            .find(|l| l.contains(".png"))
            .expect("screenshot path in script");
        assert!(paths.insert(path_line.to_string()), "duplicate screenshot path");
    }
}
