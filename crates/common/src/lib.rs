//! Sitecheck Common Library
//!
//! Shared types for the sitecheck UI verification toolkit: the scenario
//! model, the built-in scenario registry, check result records, and
//! configuration.

pub mod config;
pub mod error;
pub mod record;
pub mod registry;
pub mod scenario;

// Re-export commonly used types
pub use config::SiteConfig;
pub use error::{Error, Result};
pub use record::{CategorySummary, CheckRecord, Collector, RunReport, RunSummary, StepOutcome};
pub use registry::Registry;
pub use scenario::{Category, PropertyCheck, Scenario, Step, Viewport, WaitState};

/// Sitecheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
