//! Error types for the execution engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Site not reachable at {url} after {attempts} attempts")]
    TargetUnreachable { url: String, attempts: usize },

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Unknown browser '{0}' (expected chromium, firefox or webkit)")]
    UnknownBrowser(String),

    #[error("Browser script failed: {0}")]
    Script(String),

    #[error("Baseline not found: {0}")]
    BaselineNotFound(String),

    #[error("Visual comparison error: {0}")]
    Visual(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Common(#[from] sitecheck_common::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
