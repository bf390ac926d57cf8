//! Error types for configuration loading and pre-flight validation

use std::path::PathBuf;

use thiserror::Error;

use crate::cluster::ClusterError;

/// Errors raised while turning command-line arguments into an [`ArgConfig`]
///
/// [`ArgConfig`]: crate::config::ArgConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No focus expression was supplied
    #[error("missing --focus argument (use '[Conformance]' to run all conformance tests)")]
    MissingFocus,

    /// The current working directory could not be determined
    #[error("failed to determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    /// Argument parsing failed; carries the rendered usage error
    #[error("{0}")]
    InvalidArgs(String),

    /// `--help` or `--version` was requested; carries the text to print
    #[error("{0}")]
    DisplayRequested(String),
}

/// Unrecoverable conditions detected before any test work begins
#[derive(Debug, Error)]
pub enum PreflightError {
    /// The API server could not be reached or did not report a version
    #[error("Error fetching server version: {0}")]
    ServerVersion(#[from] ClusterError),

    /// The output directory did not exist and could not be created
    #[error("Error creating output directory [{}] : {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::DisplayRequested(_) => 0,
            _ => 2,
        }
    }
}

impl PreflightError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PreflightError::ServerVersion(_) => 3,
            PreflightError::OutputDir { .. } => 4,
        }
    }
}
