// src/error.rs

//! Unified error handling for the contest tracker.

use std::fmt;

use thiserror::Error;

use crate::models::Platform;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A contest source returned something unusable
    #[error("{platform} source error: {message}")]
    Source { platform: Platform, message: String },

    /// Joining the source fan-out failed
    #[error("Aggregation error: {0}")]
    Aggregation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a source error for the given platform.
    pub fn source(platform: Platform, message: impl fmt::Display) -> Self {
        Self::Source {
            platform,
            message: message.to_string(),
        }
    }

    /// Create an aggregation error.
    pub fn aggregation(message: impl fmt::Display) -> Self {
        Self::Aggregation(message.to_string())
    }
}
