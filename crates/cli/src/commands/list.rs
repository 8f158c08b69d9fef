//! List Command

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use sitecheck_common::{Registry, Scenario, SiteConfig};

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ListArgs {
    /// List only scenarios carrying this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Directory of user scenario YAML files
    #[arg(long)]
    scenario_dir: Option<PathBuf>,
}

/// Scenario display wrapper for serialization
#[derive(Serialize)]
pub struct ScenarioDisplay {
    pub id: String,
    pub title: String,
    pub category: String,
    pub viewports: String,
    pub tags: String,
    pub steps: usize,
}

impl From<&Scenario> for ScenarioDisplay {
    fn from(scenario: &Scenario) -> Self {
        Self {
            id: scenario.id.clone(),
            title: scenario.title.clone(),
            category: scenario.category.to_string(),
            viewports: scenario
                .viewports
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            tags: scenario.tags.join(", "),
            steps: scenario.steps.len(),
        }
    }
}

impl TableDisplay for ScenarioDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Category", "Viewports", "Tags", "Steps"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.category.clone(),
            self.viewports.clone(),
            self.tags.clone(),
            self.steps.to_string(),
        ]
    }
}

pub fn execute(args: ListArgs, mut config: SiteConfig, format: OutputFormat) -> Result<bool> {
    if let Some(dir) = &args.scenario_dir {
        config.scenario_dir = Some(dir.clone());
    }

    let registry = Registry::load(config.scenario_dir.as_deref())?;
    let scenarios: Vec<&Scenario> = match &args.tag {
        Some(tag) => registry.scenarios().iter().filter(|s| s.has_tag(tag)).collect(),
        None => registry.scenarios().iter().collect(),
    };

    let displays: Vec<ScenarioDisplay> = scenarios.iter().map(|s| ScenarioDisplay::from(*s)).collect();
    print_list(&displays, format);

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_display_row() {
        let registry = Registry::builtin();
        let scenario = registry.by_id("CAR-06").unwrap();
        let display = ScenarioDisplay::from(&scenario);

        assert_eq!(display.id, "CAR-06");
        assert_eq!(display.category, "carousel");
        assert!(display.viewports.contains("1280x720"));
        assert!(display.viewports.contains("375x667"));
        assert_eq!(display.row().len(), ScenarioDisplay::headers().len());
    }
}
