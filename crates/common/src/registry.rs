//! Built-in scenario registry
//!
//! The checks the site is expected to satisfy, grouped by component:
//! hero carousel, autoplaying hero video, and the booking form. User YAML
//! scenarios loaded from a directory extend the registry; an id collision
//! replaces the built-in definition.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::scenario::{Category, PropertyCheck, Scenario, Step, Viewport, WaitState};

/// The merged scenario set for a run
pub struct Registry {
    scenarios: Vec<Scenario>,
}

impl Registry {
    /// Registry containing only the built-in scenarios
    pub fn builtin() -> Self {
        Self { scenarios: builtin_scenarios() }
    }

    /// Built-ins merged with user scenarios from a directory.
    ///
    /// A user scenario with an id that matches a built-in replaces it;
    /// duplicate ids within the user set are an error.
    pub fn load(scenario_dir: Option<&Path>) -> Result<Self> {
        let mut scenarios = builtin_scenarios();

        if let Some(dir) = scenario_dir {
            if dir.is_dir() {
                let user = Scenario::load_dir(dir)?;
                debug!("loaded {} user scenario(s) from {}", user.len(), dir.display());

                let mut seen = HashSet::new();
                for scenario in user {
                    if !seen.insert(scenario.id.clone()) {
                        return Err(Error::DuplicateScenario(scenario.id));
                    }
                    match scenarios.iter_mut().find(|s| s.id == scenario.id) {
                        Some(existing) => *existing = scenario,
                        None => scenarios.push(scenario),
                    }
                }
            }
        }

        Ok(Self { scenarios })
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Scenarios carrying the given tag
    pub fn tagged(&self, tag: &str) -> Vec<Scenario> {
        self.scenarios.iter().filter(|s| s.has_tag(tag)).cloned().collect()
    }

    /// Scenario with the given requirement id
    pub fn by_id(&self, id: &str) -> Result<Scenario> {
        self.scenarios
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Error::ScenarioNotFound(id.to_string()))
    }
}

fn navigate_home() -> Step {
    Step::Navigate {
        url: "/".to_string(),
        wait_for_selector: None,
    }
}

fn wait_visible(selector: &str) -> Step {
    Step::Wait {
        selector: selector.to_string(),
        timeout_ms: 5000,
        state: WaitState::Visible,
    }
}

fn expect_visible(selector: &str) -> Step {
    Step::Expect {
        selector: selector.to_string(),
        visible: Some(true),
        text: None,
        text_contains: None,
        attribute: None,
        style: None,
        count: None,
    }
}

fn expect_attribute(selector: &str, name: &str) -> Step {
    Step::Expect {
        selector: selector.to_string(),
        visible: None,
        text: None,
        text_contains: None,
        attribute: Some(PropertyCheck {
            name: name.to_string(),
            value: None,
            contains: None,
        }),
        style: None,
        count: None,
    }
}

fn evaluate(script: &str) -> Step {
    Step::Evaluate {
        script: script.to_string(),
        expect_truthy: true,
    }
}

fn builtin_scenarios() -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    scenarios.extend(carousel_scenarios());
    scenarios.extend(video_scenarios());
    scenarios.extend(booking_form_scenarios());
    scenarios
}

fn carousel_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "CAR-01".to_string(),
            title: "Hero carousel renders on the landing page".to_string(),
            description: "The carousel container is present and visible after load.".to_string(),
            category: Category::Carousel,
            tags: vec!["carousel".into(), "smoke".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                navigate_home(),
                wait_visible(".carousel"),
                expect_visible(".carousel"),
                Step::Screenshot {
                    name: "carousel".to_string(),
                    selector: Some(".carousel".to_string()),
                    full_page: false,
                },
            ],
        },
        Scenario {
            id: "CAR-02".to_string(),
            title: "Carousel auto-rotates to the next slide".to_string(),
            description: "The active slide changes without interaction within the rotation \
                          interval."
                .to_string(),
            category: Category::Carousel,
            tags: vec!["carousel".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                navigate_home(),
                wait_visible(".carousel"),
                evaluate(
                    "window.__carouselSlide = document.querySelector('.carousel .slide.active')\
                     ?.textContent ?? null; return true;",
                ),
                Step::Sleep { ms: 5500 },
                evaluate(
                    "return (document.querySelector('.carousel .slide.active')?.textContent \
                     ?? null) !== window.__carouselSlide;",
                ),
            ],
        },
        Scenario {
            id: "CAR-03".to_string(),
            title: "Carousel next control advances the slide".to_string(),
            description: "Clicking the next control is accepted and the carousel stays visible."
                .to_string(),
            category: Category::Carousel,
            tags: vec!["carousel".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                navigate_home(),
                wait_visible(".carousel"),
                evaluate(
                    "window.__carouselSlide = document.querySelector('.carousel .slide.active')\
                     ?.textContent ?? null; return true;",
                ),
                Step::Click {
                    selector: ".carousel .carousel-control-next".to_string(),
                    timeout_ms: None,
                },
                Step::Sleep { ms: 700 },
                evaluate(
                    "return (document.querySelector('.carousel .slide.active')?.textContent \
                     ?? null) !== window.__carouselSlide;",
                ),
            ],
        },
        Scenario {
            id: "CAR-04".to_string(),
            title: "Carousel slide indicators are present".to_string(),
            description: String::new(),
            category: Category::Carousel,
            tags: vec!["carousel".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                navigate_home(),
                wait_visible(".carousel"),
                expect_visible(".carousel .carousel-indicators"),
            ],
        },
        Scenario {
            id: "CAR-05".to_string(),
            title: "Carousel pauses rotation on hover".to_string(),
            description: "While the pointer rests on the carousel the active slide must not \
                          change."
                .to_string(),
            category: Category::Carousel,
            tags: vec!["carousel".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                navigate_home(),
                wait_visible(".carousel"),
                Step::Hover { selector: ".carousel".to_string() },
                evaluate(
                    "window.__carouselSlide = document.querySelector('.carousel .slide.active')\
                     ?.textContent ?? null; return true;",
                ),
                Step::Sleep { ms: 5500 },
                evaluate(
                    "return (document.querySelector('.carousel .slide.active')?.textContent \
                     ?? null) === window.__carouselSlide;",
                ),
            ],
        },
        Scenario {
            id: "CAR-06".to_string(),
            title: "Carousel is visible at every breakpoint".to_string(),
            description: String::new(),
            category: Category::Carousel,
            tags: vec!["carousel".into(), "responsive".into()],
            viewports: Viewport::presets(),
            steps: vec![
                navigate_home(),
                wait_visible(".carousel"),
                expect_visible(".carousel"),
            ],
        },
    ]
}

fn video_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "VID-01".to_string(),
            title: "Hero video element is present".to_string(),
            description: String::new(),
            category: Category::Video,
            tags: vec!["video".into(), "smoke".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![navigate_home(), wait_visible("video"), expect_visible("video")],
        },
        Scenario {
            id: "VID-02".to_string(),
            title: "Hero video carries autoplay attributes".to_string(),
            description: "Autoplay policies require autoplay, muted and playsinline on the \
                          element."
                .to_string(),
            category: Category::Video,
            tags: vec!["video".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                navigate_home(),
                wait_visible("video"),
                expect_attribute("video", "autoplay"),
                expect_attribute("video", "muted"),
                expect_attribute("video", "playsinline"),
            ],
        },
        Scenario {
            id: "VID-03".to_string(),
            title: "Hero video is actually playing".to_string(),
            description: "The element reports progress, not just an autoplay attribute."
                .to_string(),
            category: Category::Video,
            tags: vec!["video".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                navigate_home(),
                wait_visible("video"),
                Step::Sleep { ms: 1500 },
                evaluate(
                    "const v = document.querySelector('video'); \
                     return !!v && !v.paused && v.currentTime > 0;",
                ),
            ],
        },
        Scenario {
            id: "VID-04".to_string(),
            title: "Hero video plays muted".to_string(),
            description: String::new(),
            category: Category::Video,
            tags: vec!["video".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                navigate_home(),
                wait_visible("video"),
                evaluate("return document.querySelector('video')?.muted === true;"),
            ],
        },
    ]
}

fn booking_form_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "BOOK-01".to_string(),
            title: "Booking form renders with its required fields".to_string(),
            description: String::new(),
            category: Category::BookingForm,
            tags: vec!["booking".into(), "smoke".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                Step::Navigate {
                    url: "/booking".to_string(),
                    wait_for_selector: Some("form.booking".to_string()),
                },
                expect_visible("form.booking [name=\"name\"]"),
                expect_visible("form.booking [name=\"email\"]"),
                expect_visible("form.booking [name=\"date\"]"),
                expect_visible("form.booking button[type=\"submit\"]"),
            ],
        },
        Scenario {
            id: "BOOK-02".to_string(),
            title: "Email field is required and typed as email".to_string(),
            description: String::new(),
            category: Category::BookingForm,
            tags: vec!["booking".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                Step::Navigate {
                    url: "/booking".to_string(),
                    wait_for_selector: Some("form.booking".to_string()),
                },
                expect_attribute("form.booking [name=\"email\"]", "required"),
                Step::Expect {
                    selector: "form.booking [name=\"email\"]".to_string(),
                    visible: None,
                    text: None,
                    text_contains: None,
                    attribute: Some(PropertyCheck {
                        name: "type".to_string(),
                        value: Some("email".to_string()),
                        contains: None,
                    }),
                    style: None,
                    count: None,
                },
            ],
        },
        Scenario {
            id: "BOOK-03".to_string(),
            title: "Submit is gated until the form is filled".to_string(),
            description: "The submit button starts disabled and becomes clickable once every \
                          required field holds a value."
                .to_string(),
            category: Category::BookingForm,
            tags: vec!["booking".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                Step::Navigate {
                    url: "/booking".to_string(),
                    wait_for_selector: Some("form.booking".to_string()),
                },
                expect_attribute("form.booking button[type=\"submit\"]", "disabled"),
                Step::Fill {
                    selector: "form.booking [name=\"name\"]".to_string(),
                    value: "Ada Lovelace".to_string(),
                    clear_first: false,
                },
                Step::Fill {
                    selector: "form.booking [name=\"email\"]".to_string(),
                    value: "ada@example.com".to_string(),
                    clear_first: false,
                },
                Step::Fill {
                    selector: "form.booking [name=\"date\"]".to_string(),
                    value: "2026-09-01".to_string(),
                    clear_first: false,
                },
                evaluate(
                    "return !document.querySelector('form.booking button[type=\"submit\"]')\
                     .disabled;",
                ),
            ],
        },
        Scenario {
            id: "BOOK-04".to_string(),
            title: "Invalid email is rejected client-side".to_string(),
            description: String::new(),
            category: Category::BookingForm,
            tags: vec!["booking".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                Step::Navigate {
                    url: "/booking".to_string(),
                    wait_for_selector: Some("form.booking".to_string()),
                },
                Step::Fill {
                    selector: "form.booking [name=\"email\"]".to_string(),
                    value: "not-an-email".to_string(),
                    clear_first: true,
                },
                evaluate(
                    "return document.querySelector('form.booking [name=\"email\"]')\
                     .checkValidity() === false;",
                ),
            ],
        },
        Scenario {
            id: "BOOK-05".to_string(),
            title: "Date field constrains past dates".to_string(),
            description: "The date input publishes a minimum date so past days cannot be booked."
                .to_string(),
            category: Category::BookingForm,
            tags: vec!["booking".into()],
            viewports: vec![Viewport::DESKTOP],
            steps: vec![
                Step::Navigate {
                    url: "/booking".to_string(),
                    wait_for_selector: Some("form.booking".to_string()),
                },
                expect_attribute("form.booking [name=\"date\"]", "min"),
            ],
        },
        Scenario {
            id: "BOOK-06".to_string(),
            title: "Booking form renders at every breakpoint".to_string(),
            description: String::new(),
            category: Category::BookingForm,
            tags: vec!["booking".into(), "responsive".into()],
            viewports: Viewport::presets(),
            steps: vec![
                Step::Navigate {
                    url: "/booking".to_string(),
                    wait_for_selector: Some("form.booking".to_string()),
                },
                expect_visible("form.booking"),
                Step::Screenshot {
                    name: "booking-form".to_string(),
                    selector: None,
                    full_page: true,
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_registry_is_populated() {
        let registry = Registry::builtin();
        assert!(registry.len() >= 12);
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let registry = Registry::builtin();
        let mut seen = HashSet::new();
        for scenario in registry.scenarios() {
            assert!(seen.insert(scenario.id.clone()), "duplicate id {}", scenario.id);
        }
    }

    #[test]
    fn test_builtin_scenarios_are_valid() {
        for scenario in Registry::builtin().scenarios() {
            scenario.validate().unwrap();
        }
    }

    #[test]
    fn test_builtin_covers_all_three_components() {
        let registry = Registry::builtin();
        for category in [Category::Carousel, Category::Video, Category::BookingForm] {
            assert!(
                registry.scenarios().iter().any(|s| s.category == category),
                "no scenario for {}",
                category
            );
        }
    }

    #[test]
    fn test_tag_filter() {
        let registry = Registry::builtin();
        let smoke = registry.tagged("smoke");
        assert!(!smoke.is_empty());
        assert!(smoke.iter().all(|s| s.has_tag("smoke")));
    }

    #[test]
    fn test_by_id() {
        let registry = Registry::builtin();
        let scenario = registry.by_id("VID-02").unwrap();
        assert_eq!(scenario.category, Category::Video);

        assert!(matches!(
            registry.by_id("NOPE-99"),
            Err(Error::ScenarioNotFound(_))
        ));
    }

    #[test]
    fn test_user_scenario_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("car-01.yaml")).unwrap();
        write!(
            file,
            r#"
id: CAR-01
title: Carousel uses the rebranded selector
category: carousel
steps:
  - action: expect
    selector: '.hero-slider'
    visible: true
"#
        )
        .unwrap();

        let registry = Registry::load(Some(dir.path())).unwrap();
        assert_eq!(registry.len(), Registry::builtin().len());
        let scenario = registry.by_id("CAR-01").unwrap();
        assert_eq!(scenario.title, "Carousel uses the rebranded selector");
    }

    #[test]
    fn test_user_scenario_extends_registry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("nav.yml"),
            r#"
id: NAV-01
title: Navigation bar is visible
category: navigation
steps:
  - action: expect
    selector: 'nav'
    visible: true
"#,
        )
        .unwrap();

        let registry = Registry::load(Some(dir.path())).unwrap();
        assert_eq!(registry.len(), Registry::builtin().len() + 1);
    }

    #[test]
    fn test_missing_scenario_dir_is_not_an_error() {
        let registry = Registry::load(Some(Path::new("/nonexistent/scenarios"))).unwrap();
        assert_eq!(registry.len(), Registry::builtin().len());
    }
}
