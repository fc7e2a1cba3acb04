//! Error types for banner-cli

use thiserror::Error;

/// Result type alias using the CLI error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a command
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the reconciliation library
    #[error(transparent)]
    Core(#[from] banner_core::Error),

    /// Transport or status error talking to the wiki
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No built-in profile with this name
    #[error("unknown game '{0}', expected genshin or star-rail")]
    UnknownGame(String),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
