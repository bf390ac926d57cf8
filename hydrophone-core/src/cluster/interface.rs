//! Cluster capability traits and common types

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Version information reported by the API server's `/version` endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerVersion {
    pub major: String,
    pub minor: String,
    pub git_version: String,
    pub git_commit: String,
    pub git_tree_state: String,
    pub build_date: String,
    pub go_version: String,
    pub compiler: String,
    pub platform: String,
}

impl ServerVersion {
    /// Build a version with only the release fields populated
    pub fn release(major: &str, minor: &str, git_version: &str) -> Self {
        Self {
            major: major.to_string(),
            minor: minor.to_string(),
            git_version: git_version.to_string(),
            ..Default::default()
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.git_version)
    }
}

/// Errors that can occur while talking to the cluster
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The API server could not be reached
    #[error("API server unreachable: {0}")]
    Unreachable(String),

    /// The API server answered with an error
    #[error("API server returned an error: {0}")]
    Api(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

/// Anything that can report the API server version
#[async_trait]
pub trait ServerVersionSource: Send + Sync {
    /// Query the API server for its version
    async fn server_version(&self) -> Result<ServerVersion, ClusterError>;
}

/// Connection details of the cluster being tested
pub trait ApiEndpoint {
    /// API server address, e.g. `https://10.0.0.1:6443`
    fn host(&self) -> String;
}
