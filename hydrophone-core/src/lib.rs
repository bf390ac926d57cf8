//! Hydrophone Core Library
//!
//! Configuration record, cluster abstraction and pre-flight validation for the
//! Hydrophone conformance runner. Nothing in this crate touches process-wide
//! state: arguments come in as values and failures come back as errors.

pub mod cluster;
pub mod config;
pub mod error;
pub mod preflight;

// Re-export common types
pub use cluster::{ApiEndpoint, ClusterError, MockCluster, ServerVersion, ServerVersionSource};
pub use config::{
    default_output_dir, ArgConfig, DEFAULT_BUSYBOX_IMAGE, DEFAULT_CONFORMANCE_IMAGE,
};
pub use error::{ConfigError, PreflightError};
pub use preflight::{ensure_output_dir, summary_lines, validate_args, PreflightReport};
