//! Error types for the news client.
//!
//! Network, storage and configuration failures all surface as [`NewsError`].
//! Favorites operations catch most of these internally and degrade to an
//! empty collection; the rest propagate to the CLI.

use thiserror::Error;

/// Library error type
#[derive(Error, Debug)]
pub enum NewsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend responded with HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Backend reported an error: {0}")]
    Api(String),

    #[error("No articles available")]
    NoArticles,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid article: {0}")]
    InvalidArticle(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication failed: {0}")]
    Auth(String),
}

/// Result type alias for the news client
pub type Result<T> = std::result::Result<T, NewsError>;
