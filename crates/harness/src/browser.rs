//! Playwright browser automation
//!
//! Scenario steps are translated into a generated JavaScript program, run
//! through `node` against the Playwright library, and reported back over a
//! single JSON result line on stdout. One node invocation covers a whole
//! scenario, so page state (and `window` stash variables used by evaluate
//! steps) persists across steps.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::str::FromStr;

use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tracing::debug;

use sitecheck_common::{Step, StepOutcome, Viewport, WaitState};

use crate::error::{HarnessError, HarnessResult};

/// Marker prefix of the result line printed by generated scripts
const RESULT_MARKER: &str = "SITECHECK_RESULT ";

/// Browser engine to drive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl FromStr for BrowserKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" => Ok(BrowserKind::Webkit),
            other => Err(HarnessError::UnknownBrowser(other.to_string())),
        }
    }
}

/// Configuration for the driver
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub base_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub screenshot_dir: PathBuf,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            browser: BrowserKind::Chromium,
            headless: true,
            screenshot_dir: PathBuf::from("test-results/screenshots"),
        }
    }
}

/// Drives Playwright through generated node scripts
pub struct PlaywrightDriver {
    base_url: String,
    browser: BrowserKind,
    headless: bool,
    screenshot_dir: PathBuf,
}

impl PlaywrightDriver {
    /// Create a driver, creating the screenshot directory.
    ///
    /// Call [`PlaywrightDriver::ensure_installed`] before driving a real
    /// browser; script generation itself needs no installation.
    pub fn new(config: DriverConfig) -> HarnessResult<Self> {
        std::fs::create_dir_all(&config.screenshot_dir)?;
        // node runs from a temp dir, so screenshot paths must be absolute
        let screenshot_dir = config.screenshot_dir.canonicalize()?;

        Ok(Self {
            base_url: config.base_url,
            browser: config.browser,
            headless: config.headless,
            screenshot_dir,
        })
    }

    /// Verify Playwright is reachable through npx
    pub fn ensure_installed() -> HarnessResult<()> {
        let status = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(HarnessError::PlaywrightNotFound),
        }
    }

    /// Run a scenario's steps under one viewport.
    ///
    /// `shot_prefix` namespaces screenshot files so the same scenario can
    /// run under several viewports without clobbering its own images.
    pub async fn run(
        &self,
        viewport: Viewport,
        steps: &[Step],
        shot_prefix: &str,
    ) -> HarnessResult<Vec<StepOutcome>> {
        let script = self.script_for(viewport, steps, shot_prefix);

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("scenario.js");
        std::fs::write(&script_path, &script)?;

        debug!("running scenario script {}", script_path.display());

        let output = TokioCommand::new("node")
            .arg(&script_path)
            .current_dir(temp_dir.path())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let report = parse_result_line(&stdout).ok_or_else(|| {
            HarnessError::Script(format!(
                "no result line in script output\nstdout: {}\nstderr: {}",
                stdout.trim(),
                String::from_utf8_lossy(&output.stderr).trim()
            ))
        })?;

        let mut outcomes: Vec<StepOutcome> = report
            .outcomes
            .into_iter()
            .map(|o| StepOutcome {
                step: o.step,
                passed: o.passed,
                duration_ms: o.duration_ms,
                detail: o.detail,
                screenshot: None,
            })
            .collect();

        // Attach the screenshot path to each screenshot step that ran
        for (outcome, step) in outcomes.iter_mut().zip(steps.iter()) {
            if let Step::Screenshot { name, .. } = step {
                if outcome.passed {
                    outcome.screenshot =
                        Some(self.screenshot_path(shot_prefix, name).to_string_lossy().to_string());
                }
            }
        }

        Ok(outcomes)
    }

    fn screenshot_path(&self, prefix: &str, name: &str) -> PathBuf {
        self.screenshot_dir.join(format!("{}{}.png", prefix, name))
    }

    /// Generate the node program for a list of steps
    pub fn script_for(&self, viewport: Viewport, steps: &[Step], shot_prefix: &str) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            r#"const {{ chromium, firefox, webkit }} = require('playwright');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  const base = {base_url};
  const outcomes = [];

  async function step(label, fn) {{
    const started = Date.now();
    try {{
      await fn();
      outcomes.push({{ step: label, passed: true, duration_ms: Date.now() - started }});
    }} catch (err) {{
      outcomes.push({{
        step: label,
        passed: false,
        duration_ms: Date.now() - started,
        detail: String((err && err.message) || err),
      }});
      throw err;
    }}
  }}

  try {{
"#,
            browser = self.browser.as_str(),
            headless = self.headless,
            width = viewport.width,
            height = viewport.height,
            base_url = js_str(&self.base_url),
        ));

        for (i, step) in steps.iter().enumerate() {
            script.push_str(&format!("    // Step {}: {}\n", i + 1, step.label()));
            script.push_str(&format!("    await step({}, async () => {{\n", js_str(&step.label())));
            script.push_str(&self.step_js(step, shot_prefix));
            script.push_str("    });\n\n");
        }

        script.push_str(&format!(
            r#"  }} catch (err) {{
    // the failing step is already recorded; later steps do not run
  }} finally {{
    console.log('{marker}' + JSON.stringify({{ outcomes }}));
    await browser.close();
  }}
}})();
"#,
            marker = RESULT_MARKER,
        ));

        script
    }

    /// JavaScript body for one step, indented for the step() wrapper
    fn step_js(&self, step: &Step, shot_prefix: &str) -> String {
        match step {
            Step::Navigate { url, wait_for_selector } => {
                let mut js = format!("      await page.goto(base + {});\n", js_str(url));
                if let Some(selector) = wait_for_selector {
                    js.push_str(&format!(
                        "      await page.waitForSelector({});\n",
                        js_str(selector)
                    ));
                }
                js
            }
            Step::Wait { selector, timeout_ms, state } => {
                let state = match state {
                    WaitState::Visible => "visible",
                    WaitState::Hidden => "hidden",
                    WaitState::Attached => "attached",
                    WaitState::Detached => "detached",
                };
                format!(
                    "      await page.waitForSelector({}, {{ state: '{}', timeout: {} }});\n",
                    js_str(selector),
                    state,
                    timeout_ms
                )
            }
            Step::Sleep { ms } => format!("      await page.waitForTimeout({});\n", ms),
            Step::Click { selector, timeout_ms } => format!(
                "      await page.click({}, {{ timeout: {} }});\n",
                js_str(selector),
                timeout_ms.unwrap_or(5000)
            ),
            Step::Hover { selector } => {
                format!("      await page.hover({});\n", js_str(selector))
            }
            Step::Fill { selector, value, clear_first } => {
                let mut js = String::new();
                if *clear_first {
                    js.push_str(&format!("      await page.fill({}, '');\n", js_str(selector)));
                }
                js.push_str(&format!(
                    "      await page.fill({}, {});\n",
                    js_str(selector),
                    js_str(value)
                ));
                js
            }
            Step::Select { selector, value } => format!(
                "      await page.selectOption({}, {});\n",
                js_str(selector),
                js_str(value)
            ),
            Step::Press { selector, key } => match selector {
                Some(selector) => format!(
                    "      await page.locator({}).press({});\n",
                    js_str(selector),
                    js_str(key)
                ),
                None => format!("      await page.keyboard.press({});\n", js_str(key)),
            },
            Step::Expect { selector, visible, text, text_contains, attribute, style, count } => {
                let mut js = String::new();

                if let Some(visible) = visible {
                    if *visible {
                        js.push_str(&format!(
                            "      if (!(await page.locator({sel}).first().isVisible())) {{\n        throw new Error({msg});\n      }}\n",
                            sel = js_str(selector),
                            msg = js_str(&format!("element not visible: {}", selector)),
                        ));
                    } else {
                        js.push_str(&format!(
                            "      if (await page.locator({sel}).first().isVisible()) {{\n        throw new Error({msg});\n      }}\n",
                            sel = js_str(selector),
                            msg = js_str(&format!("element unexpectedly visible: {}", selector)),
                        ));
                    }
                }

                if let Some(expected) = text {
                    js.push_str(&format!(
                        "      {{\n        const text = ((await page.locator({sel}).first().textContent()) || '').trim();\n        if (text !== {expected}) {{\n          throw new Error({msg} + text);\n        }}\n      }}\n",
                        sel = js_str(selector),
                        expected = js_str(expected),
                        msg = js_str(&format!("text of {} != '{}': got ", selector, expected)),
                    ));
                }

                if let Some(fragment) = text_contains {
                    js.push_str(&format!(
                        "      {{\n        const text = (await page.locator({sel}).first().textContent()) || '';\n        if (!text.includes({fragment})) {{\n          throw new Error({msg} + text);\n        }}\n      }}\n",
                        sel = js_str(selector),
                        fragment = js_str(fragment),
                        msg = js_str(&format!("text of {} missing '{}': got ", selector, fragment)),
                    ));
                }

                if let Some(check) = attribute {
                    js.push_str(&format!(
                        "      {{\n        const value = await page.locator({sel}).first().getAttribute({name});\n",
                        sel = js_str(selector),
                        name = js_str(&check.name),
                    ));
                    js.push_str(&format!(
                        "        if (value === null) {{\n          throw new Error({msg});\n        }}\n",
                        msg = js_str(&format!("missing attribute '{}' on {}", check.name, selector)),
                    ));
                    if let Some(expected) = &check.value {
                        js.push_str(&format!(
                            "        if (value !== {expected}) {{\n          throw new Error({msg} + value);\n        }}\n",
                            expected = js_str(expected),
                            msg = js_str(&format!(
                                "attribute '{}' of {} != '{}': got ",
                                check.name, selector, expected
                            )),
                        ));
                    }
                    if let Some(fragment) = &check.contains {
                        js.push_str(&format!(
                            "        if (!value.includes({fragment})) {{\n          throw new Error({msg} + value);\n        }}\n",
                            fragment = js_str(fragment),
                            msg = js_str(&format!(
                                "attribute '{}' of {} missing '{}': got ",
                                check.name, selector, fragment
                            )),
                        ));
                    }
                    js.push_str("      }\n");
                }

                if let Some(check) = style {
                    js.push_str(&format!(
                        "      {{\n        const value = await page.locator({sel}).first().evaluate(\n          (el) => getComputedStyle(el).getPropertyValue({name}));\n",
                        sel = js_str(selector),
                        name = js_str(&check.name),
                    ));
                    if let Some(expected) = &check.value {
                        js.push_str(&format!(
                            "        if (value.trim() !== {expected}) {{\n          throw new Error({msg} + value);\n        }}\n",
                            expected = js_str(expected),
                            msg = js_str(&format!(
                                "style '{}' of {} != '{}': got ",
                                check.name, selector, expected
                            )),
                        ));
                    } else if let Some(fragment) = &check.contains {
                        js.push_str(&format!(
                            "        if (!value.includes({fragment})) {{\n          throw new Error({msg} + value);\n        }}\n",
                            fragment = js_str(fragment),
                            msg = js_str(&format!(
                                "style '{}' of {} missing '{}': got ",
                                check.name, selector, fragment
                            )),
                        ));
                    } else {
                        js.push_str(&format!(
                            "        if (value.trim() === '') {{\n          throw new Error({msg});\n        }}\n",
                            msg = js_str(&format!(
                                "style '{}' of {} is empty",
                                check.name, selector
                            )),
                        ));
                    }
                    js.push_str("      }\n");
                }

                if let Some(expected) = count {
                    js.push_str(&format!(
                        "      {{\n        const count = await page.locator({sel}).count();\n        if (count !== {expected}) {{\n          throw new Error({msg} + count);\n        }}\n      }}\n",
                        sel = js_str(selector),
                        expected = expected,
                        msg = js_str(&format!("expected {} of {}, found ", expected, selector)),
                    ));
                }

                js
            }
            Step::Screenshot { name, selector, full_page } => {
                let path = self.screenshot_path(shot_prefix, name);
                let path = js_str(&path.to_string_lossy());
                match selector {
                    Some(selector) => format!(
                        "      await page.locator({}).screenshot({{ path: {} }});\n",
                        js_str(selector),
                        path
                    ),
                    None => format!(
                        "      await page.screenshot({{ path: {}, fullPage: {} }});\n",
                        path, full_page
                    ),
                }
            }
            Step::Evaluate { script, expect_truthy } => {
                let mut js = format!(
                    "      const result = await page.evaluate(() => {{ {} }});\n",
                    script
                );
                if *expect_truthy {
                    js.push_str(
                        "      if (!result) {\n        throw new Error('evaluate returned a falsy result');\n      }\n",
                    );
                }
                js
            }
        }
    }
}

/// Escape a string into a single-quoted JavaScript literal
fn js_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[derive(Debug, Deserialize)]
struct ScriptReport {
    outcomes: Vec<ScriptOutcome>,
}

#[derive(Debug, Deserialize)]
struct ScriptOutcome {
    step: String,
    passed: bool,
    duration_ms: u64,
    #[serde(default)]
    detail: Option<String>,
}

/// Find and parse the result line in script stdout
fn parse_result_line(stdout: &str) -> Option<ScriptReport> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix(RESULT_MARKER))
        .and_then(|json| serde_json::from_str(json).ok())
}
