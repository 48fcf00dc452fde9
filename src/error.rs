// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the cue engine.
//!
//! Nothing in the core is fatal: validation errors are raised at the load
//! boundary, lookups that miss become no-ops, and resource failures are
//! turned into `Error` events by whoever hit them.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CueError>;

/// Errors raised by the cue engine
#[derive(Debug, Error)]
pub enum CueError {
    /// A song or setlist document is missing a field or has a bad value
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A song id, file, or index does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The position source or song loader could not answer
    #[error("Resource unavailable: {0}")]
    Resource(String),

    /// An observer could not take delivery of a value
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CueError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        CueError::Validation(message.into())
    }

    /// Shorthand for a resource failure
    pub fn resource(message: impl Into<String>) -> Self {
        CueError::Resource(message.into())
    }
}
