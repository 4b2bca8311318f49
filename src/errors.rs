// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagewatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network, timeout, non-2xx status or extraction failure.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Delivery to the notification channel failed.
    #[error("Notify error: {0}")]
    Notify(String),

    /// Reading or writing the snapshot cache failed.
    #[error("Persist error: {0}")]
    Persist(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PagewatchError>;
