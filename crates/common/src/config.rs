//! Run configuration
//!
//! Layering order: built-in defaults, then `sitecheck.toml` if present,
//! then environment (`SITECHECK_BASE_URL`), then CLI flags (applied by the
//! binary).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "sitecheck.toml";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "SITECHECK_BASE_URL";

/// Top-level configuration for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL of the site under test. The server is external: sitecheck
    /// never starts or stops it.
    pub base_url: String,

    /// Directory of user-authored scenario YAML files
    pub scenario_dir: Option<PathBuf>,

    /// Directory report artifacts and screenshots are written to
    pub output_dir: PathBuf,

    /// Browser engine name: chromium, firefox or webkit
    pub browser: String,

    pub headless: bool,

    /// Seconds to wait for the site to answer before giving up
    pub startup_timeout_secs: u64,

    pub visual: VisualSettings,
}

/// Screenshot comparison settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    pub enabled: bool,
    /// Allowed pixel difference, percent of total pixels
    pub threshold: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            scenario_dir: None,
            output_dir: PathBuf::from("test-results"),
            browser: "chromium".to_string(),
            headless: true,
            startup_timeout_secs: 30,
            visual: VisualSettings::default(),
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self { enabled: true, threshold: 0.5 }
    }
}

impl SiteConfig {
    /// Load configuration from an explicit file, or from `sitecheck.toml`
    /// in the working directory when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        let mut config = if candidate.is_file() {
            debug!("loading config from {}", candidate.display());
            let content = std::fs::read_to_string(&candidate)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
    }

    /// Directory screenshots are written to during a run
    pub fn screenshot_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }

    /// Directory baseline screenshots are stored in
    pub fn baseline_dir(&self) -> PathBuf {
        self.output_dir.join("baselines")
    }

    /// Directory diff images are written to on a visual mismatch
    pub fn diff_dir(&self) -> PathBuf {
        self.output_dir.join("diffs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.output_dir, PathBuf::from("test-results"));
        assert_eq!(config.browser, "chromium");
        assert!(config.headless);
        assert_eq!(config.visual.threshold, 0.5);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: SiteConfig = toml::from_str(
            r#"
base_url = "http://localhost:4000"

[visual]
threshold = 1.5
"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:4000");
        assert_eq!(config.visual.threshold, 1.5);
        // Untouched fields keep their defaults
        assert_eq!(config.browser, "chromium");
        assert_eq!(config.startup_timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitecheck.toml");
        std::fs::write(&path, "base_url = \"http://localhost:3001\"\nheadless = false\n").unwrap();

        let config = SiteConfig::load(Some(&path)).unwrap();
        assert_eq!(config.base_url, "http://localhost:3001");
        assert!(!config.headless);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = SiteConfig::load(Some(Path::new("/nonexistent/sitecheck.toml"))).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_derived_directories() {
        let config = SiteConfig::default();
        assert_eq!(config.screenshot_dir(), PathBuf::from("test-results/screenshots"));
        assert_eq!(config.baseline_dir(), PathBuf::from("test-results/baselines"));
        assert_eq!(config.diff_dir(), PathBuf::from("test-results/diffs"));
    }
}
