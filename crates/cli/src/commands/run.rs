//! Run Command

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use sitecheck_common::{Registry, Scenario, SiteConfig};
use sitecheck_harness::{
    BrowserKind, RunnerConfig, ScenarioRunner, VisualComparer, VisualConfig,
};
use sitecheck_report::{ConsoleRenderer, write_artifacts};

use crate::output::{print_error, print_warning};

#[derive(Args)]
pub struct RunArgs {
    /// Run only scenarios carrying this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only the scenario with this requirement id
    #[arg(long)]
    id: Option<String>,

    /// Browser engine (chromium, firefox, webkit)
    #[arg(long)]
    browser: Option<String>,

    /// Run the browser headless
    #[arg(long)]
    headless: Option<bool>,

    /// Directory of user scenario YAML files
    #[arg(long)]
    scenario_dir: Option<PathBuf>,

    /// Output directory for report artifacts and screenshots
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Promote this run's screenshots to visual baselines
    #[arg(long)]
    update_baselines: bool,

    /// Skip writing report artifacts
    #[arg(long)]
    no_report: bool,
}

pub async fn execute(args: RunArgs, mut config: SiteConfig) -> Result<bool> {
    if let Some(browser) = &args.browser {
        config.browser = browser.clone();
    }
    if let Some(headless) = args.headless {
        config.headless = headless;
    }
    if let Some(dir) = &args.scenario_dir {
        config.scenario_dir = Some(dir.clone());
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }

    let registry = Registry::load(config.scenario_dir.as_deref())?;
    let scenarios: Vec<Scenario> = if let Some(id) = &args.id {
        vec![registry.by_id(id)?]
    } else if let Some(tag) = &args.tag {
        registry.tagged(tag)
    } else {
        registry.scenarios().to_vec()
    };

    if scenarios.is_empty() {
        print_warning("No scenarios selected.");
        return Ok(true);
    }

    let browser: BrowserKind = config.browser.parse()?;

    let visual = if config.visual.enabled {
        Some(VisualConfig {
            baseline_dir: config.baseline_dir(),
            actual_dir: config.screenshot_dir(),
            diff_dir: config.diff_dir(),
            threshold: config.visual.threshold,
            auto_update: args.update_baselines,
        })
    } else {
        None
    };

    let runner = ScenarioRunner::new(RunnerConfig {
        base_url: config.base_url.clone(),
        browser,
        headless: config.headless,
        output_dir: config.output_dir.clone(),
        startup_timeout: Duration::from_secs(config.startup_timeout_secs),
        visual: visual.clone(),
    });

    let report = runner.run(&scenarios).await?;

    if args.update_baselines {
        if let Some(visual) = visual {
            let updated = VisualComparer::new(visual)?.update_all_baselines()?;
            println!("Updated {} baseline(s).", updated);
        }
    }

    // A report failure aborts report generation only, never the verdict
    if !args.no_report {
        if let Err(e) = write_artifacts(&report, &config.output_dir) {
            print_error(&format!("report generation failed: {}", e));
        }
    }

    println!("{}", ConsoleRenderer::render(&report));
    let verdict = if report.all_passed() {
        "PASS".green().bold()
    } else {
        "FAIL".red().bold()
    };
    println!(
        "{} — {} passed, {} failed against {}",
        verdict, report.summary.passed, report.summary.failed, report.site
    );

    Ok(report.all_passed())
}
