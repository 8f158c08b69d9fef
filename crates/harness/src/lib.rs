//! Sitecheck execution engine
//!
//! Runs scenarios against a locally served site through Playwright:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  ScenarioRunner (sequential)               │
//! ├────────────────────────────────────────────────────────────┤
//! │  Target::wait_ready()        probe the external server     │
//! │  PlaywrightDriver::run()     one node process per scenario │
//! │  VisualComparer::compare()   screenshots vs. baselines     │
//! │  Collector::push()/finish()  records -> RunReport          │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The site under test is never spawned here; it is expected to be already
//! listening on the configured base URL.

pub mod browser;
pub mod error;
pub mod runner;
pub mod target;
pub mod visual;

pub use browser::{BrowserKind, DriverConfig, PlaywrightDriver};
pub use error::{HarnessError, HarnessResult};
pub use runner::{RunnerConfig, ScenarioRunner};
pub use target::Target;
pub use visual::{VisualComparer, VisualConfig, VisualDiff};
