//! Error types for sitecheck

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the sitecheck Error
pub type Result<T> = std::result::Result<T, Error>;

/// Sitecheck error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Scenario parse error in {path}: {reason}")]
    ScenarioParse { path: PathBuf, reason: String },

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Duplicate scenario id: {0}")]
    DuplicateScenario(String),

    #[error("Invalid scenario '{id}': {reason}")]
    InvalidScenario { id: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Report error: {0}")]
    Report(String),
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ScenarioParse {
            path: PathBuf::new(),
            reason: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}
