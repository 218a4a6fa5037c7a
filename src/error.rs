//! Error types for the fallible edges of the crate
//!
//! Document and component operations never fail; these cover file loading,
//! configuration, scripts and the HTTP client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid selector: {0}")]
    SelectorError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type UiResult<T> = Result<T, UiError>;
