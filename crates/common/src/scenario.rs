//! Declarative scenario model
//!
//! A scenario is a named UI requirement (id + title) checked by an ordered
//! list of browser steps. Scenarios are either built in (see
//! [`crate::registry`]) or authored as YAML files and loaded from a
//! directory.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A complete scenario, parsed from YAML or constructed by the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Requirement identifier, e.g. `CAR-01`
    pub id: String,

    /// Human-readable requirement title
    pub title: String,

    /// Longer description of what is being verified
    #[serde(default)]
    pub description: String,

    /// Which component of the site this scenario covers
    pub category: Category,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Viewports to run this scenario under, in order
    #[serde(default = "default_viewports")]
    pub viewports: Vec<Viewport>,

    /// Steps to execute in order
    pub steps: Vec<Step>,
}

fn default_viewports() -> Vec<Viewport> {
    vec![Viewport::DESKTOP]
}

/// Site component a scenario belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Carousel,
    Video,
    BookingForm,
    #[serde(untagged)]
    Custom(String),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Carousel => write!(f, "carousel"),
            Category::Video => write!(f, "video"),
            Category::BookingForm => write!(f, "booking_form"),
            Category::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const DESKTOP: Viewport = Viewport { width: 1280, height: 720 };
    pub const TABLET: Viewport = Viewport { width: 768, height: 1024 };
    pub const MOBILE: Viewport = Viewport { width: 375, height: 667 };

    /// All presets, widest first — the order the checks run in
    pub fn presets() -> Vec<Viewport> {
        vec![Self::DESKTOP, Self::TABLET, Self::MOBILE]
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single step in a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate to a URL (relative to the base URL)
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Wait for an element to reach a state
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
        #[serde(default)]
        state: WaitState,
    },

    /// Wait for a fixed amount of time (use sparingly)
    Sleep { ms: u64 },

    /// Click an element
    Click {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Hover over an element
    Hover { selector: String },

    /// Fill an input field
    Fill {
        selector: String,
        value: String,
        #[serde(default)]
        clear_first: bool,
    },

    /// Select an option from a dropdown
    Select { selector: String, value: String },

    /// Press a key, optionally on a specific element
    Press {
        #[serde(default)]
        selector: Option<String>,
        key: String,
    },

    /// Check something about an element
    Expect {
        selector: String,
        #[serde(default)]
        visible: Option<bool>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        text_contains: Option<String>,
        #[serde(default)]
        attribute: Option<PropertyCheck>,
        #[serde(default)]
        style: Option<PropertyCheck>,
        #[serde(default)]
        count: Option<usize>,
    },

    /// Take a screenshot
    Screenshot {
        name: String,
        #[serde(default)]
        selector: Option<String>,
        #[serde(default)]
        full_page: bool,
    },

    /// Run JavaScript in the page; the script must `return` a value
    Evaluate {
        script: String,
        #[serde(default)]
        expect_truthy: bool,
    },
}

fn default_wait_timeout() -> u64 {
    5000
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

/// An expectation about a named attribute or style property.
///
/// With neither `value` nor `contains` set, the check is for presence only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyCheck {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
}

impl Step {
    /// Short label for a step, used in records and logs
    pub fn label(&self) -> String {
        match self {
            Step::Navigate { url, .. } => format!("navigate:{}", url),
            Step::Wait { selector, .. } => format!("wait:{}", selector),
            Step::Sleep { ms } => format!("sleep:{}ms", ms),
            Step::Click { selector, .. } => format!("click:{}", selector),
            Step::Hover { selector } => format!("hover:{}", selector),
            Step::Fill { selector, .. } => format!("fill:{}", selector),
            Step::Select { selector, .. } => format!("select:{}", selector),
            Step::Press { key, .. } => format!("press:{}", key),
            Step::Expect { selector, .. } => format!("expect:{}", selector),
            Step::Screenshot { name, .. } => format!("screenshot:{}", name),
            Step::Evaluate { .. } => "evaluate".to_string(),
        }
    }
}

impl Scenario {
    /// Parse a scenario from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str::<Scenario>(&content)
            .map_err(|e| Error::ScenarioParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
            .and_then(|s| {
                s.validate()?;
                Ok(s)
            })
    }

    /// Load all scenarios from a directory, recursively
    pub fn load_dir(dir: &Path) -> Result<Vec<Self>> {
        let mut scenarios = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            scenarios.push(Self::from_file(entry.path())?);
        }

        Ok(scenarios)
    }

    /// Check structural requirements: at least one step, one viewport
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(Error::InvalidScenario {
                id: self.id.clone(),
                reason: "scenario has no steps".to_string(),
            });
        }
        if self.viewports.is_empty() {
            return Err(Error::InvalidScenario {
                id: self.id.clone(),
                reason: "scenario has no viewports".to_string(),
            });
        }
        Ok(())
    }

    /// Whether this scenario carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_scenario() {
        let yaml = r#"
id: CAR-01
title: Carousel is visible on the landing page
category: carousel
tags:
  - carousel
  - smoke
steps:
  - action: navigate
    url: /
    wait_for_selector: '.carousel'
  - action: expect
    selector: '.carousel'
    visible: true
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.id, "CAR-01");
        assert_eq!(scenario.category, Category::Carousel);
        assert_eq!(scenario.steps.len(), 2);
        assert_eq!(scenario.viewports, vec![Viewport::DESKTOP]);
        assert!(scenario.has_tag("smoke"));
    }

    #[test]
    fn test_parse_viewport_matrix_scenario() {
        let yaml = r#"
id: BOOK-06
title: Booking form renders at every breakpoint
category: booking_form
viewports:
  - { width: 1280, height: 720 }
  - { width: 375, height: 667 }
steps:
  - action: navigate
    url: /booking
  - action: wait
    selector: 'form.booking'
  - action: screenshot
    name: booking-form
    full_page: true
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.viewports.len(), 2);
        assert_eq!(scenario.viewports[1], Viewport::MOBILE);
    }

    #[test]
    fn test_parse_attribute_expectation() {
        let yaml = r#"
id: VID-02
title: Hero video carries autoplay attributes
category: video
steps:
  - action: expect
    selector: 'video'
    attribute:
      name: autoplay
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        match &scenario.steps[0] {
            Step::Expect { attribute: Some(check), .. } => {
                assert_eq!(check.name, "autoplay");
                assert!(check.value.is_none());
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_custom_category_roundtrip() {
        let yaml = r#"
id: NAV-01
title: Navigation bar sticks on scroll
category: navigation
steps:
  - action: expect
    selector: 'nav'
    visible: true
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.category, Category::Custom("navigation".to_string()));
        assert_eq!(scenario.category.to_string(), "navigation");
    }

    #[test]
    fn test_scenario_without_steps_is_invalid() {
        let yaml = r#"
id: EMPTY-01
title: Nothing to check
category: carousel
steps: []
"#;
        let err = Scenario::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("no steps"));
    }

    #[test]
    fn test_step_labels() {
        let step = Step::Click { selector: ".carousel-next".to_string(), timeout_ms: None };
        assert_eq!(step.label(), "click:.carousel-next");

        let step = Step::Sleep { ms: 500 };
        assert_eq!(step.label(), "sleep:500ms");
    }

    #[test]
    fn test_viewport_display() {
        assert_eq!(Viewport::DESKTOP.to_string(), "1280x720");
        assert_eq!(Viewport::MOBILE.to_string(), "375x667");
    }
}
