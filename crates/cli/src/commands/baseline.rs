//! Baseline Commands

use anyhow::Result;
use clap::Subcommand;

use sitecheck_common::SiteConfig;
use sitecheck_harness::{VisualComparer, VisualConfig};

use crate::output::print_success;

#[derive(Subcommand)]
pub enum BaselineCommands {
    /// List stored visual baselines
    List,

    /// Promote the latest screenshots to baselines
    Update,
}

pub fn execute(cmd: BaselineCommands, config: SiteConfig) -> Result<bool> {
    let comparer = VisualComparer::new(VisualConfig {
        baseline_dir: config.baseline_dir(),
        actual_dir: config.screenshot_dir(),
        diff_dir: config.diff_dir(),
        threshold: config.visual.threshold,
        auto_update: false,
    })?;

    match cmd {
        BaselineCommands::List => {
            let baselines = comparer.list_baselines()?;
            if baselines.is_empty() {
                println!("No baselines stored.");
            } else {
                for name in baselines {
                    println!("{}", name);
                }
            }
        }
        BaselineCommands::Update => {
            let updated = comparer.update_all_baselines()?;
            print_success(&format!("updated {} baseline(s)", updated));
        }
    }

    Ok(true)
}
