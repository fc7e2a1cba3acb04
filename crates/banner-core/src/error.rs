//! Error types for banner-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in banner-core
#[derive(Debug, Error)]
pub enum Error {
    /// No resolution tier produced a version for a banner page
    #[error("could not determine version from page '{title}'")]
    VersionUnresolved { title: String },

    /// Fetching the full content of a page failed
    #[error("failed to fetch content for page {page_id}: {message}")]
    ContentFetch { page_id: i64, message: String },

    /// Serialized output fell under the configured floor
    #[error("banner data was under {min_size} bytes (was {size}) -- aborting!")]
    OutputTooSmall { size: usize, min_size: usize },

    /// A weapon title pattern did not compile
    #[error("invalid title pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The wiki API reported an error in its response body
    #[error("API error: {0}")]
    Api(String),

    /// A response did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
