//! Mock cluster implementation for testing

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use super::{ApiEndpoint, ClusterError, ServerVersion, ServerVersionSource};

/// Mock cluster for testing
pub struct MockCluster {
    host: String,
    version: ServerVersion,
    /// Configurable failure simulation
    pub unreachable: AtomicBool,
    /// Number of version queries served
    pub version_calls: AtomicU32,
}

impl MockCluster {
    /// Create a reachable mock cluster reporting v1.28.0
    pub fn new() -> Self {
        Self::with_version(ServerVersion::release("1", "28", "v1.28.0"))
    }

    /// Create a reachable mock cluster reporting the given version
    pub fn with_version(version: ServerVersion) -> Self {
        Self {
            host: "https://127.0.0.1:6443".to_string(),
            version,
            unreachable: AtomicBool::new(false),
            version_calls: AtomicU32::new(0),
        }
    }

    /// Set whether version queries should fail
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// How many times the version was queried
    pub fn version_call_count(&self) -> u32 {
        self.version_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockCluster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServerVersionSource for MockCluster {
    async fn server_version(&self) -> Result<ServerVersion, ClusterError> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ClusterError::Unreachable(format!(
                "dial tcp {}: connection refused",
                self.host.trim_start_matches("https://")
            )));
        }
        Ok(self.version.clone())
    }
}

impl ApiEndpoint for MockCluster {
    fn host(&self) -> String {
        self.host.clone()
    }
}
