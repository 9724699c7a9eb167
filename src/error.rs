//! Error types for infrapipe operations.
//!
//! This module defines [`PipelineError`], the primary error type used throughout
//! the engine, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PipelineError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `PipelineError::Other`) for collaborator glue
//! - Every variant is fatal to the current run; nothing is retried

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for infrapipe operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Pipeline config file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the pipeline config file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Malformed pipeline config (bad inject reference, duplicate step, ...).
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Workspace staging conflict or missing module source.
    #[error("Workspace for step '{step}': {message}")]
    WorkspaceError { step: String, message: String },

    /// The provisioning engine exited non-zero (or could not be started).
    #[error("Provisioning engine '{operation}' failed for step '{step}' (exit code {code:?})")]
    ProvisioningError {
        step: String,
        operation: String,
        code: Option<i32>,
    },

    /// The engine's output report is missing an expected key.
    #[error("Output '{output}' missing from the output report of step '{step}'")]
    OutputResolutionError { step: String, output: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    /// Shorthand for a [`PipelineError::ConfigError`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Shorthand for a [`PipelineError::WorkspaceError`].
    pub fn workspace(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WorkspaceError {
            step: step.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for infrapipe operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
