//! Cluster abstraction layer
//!
//! The pre-flight step only needs two things from a cluster: the address of
//! its API server and the version it reports.

mod interface;
mod mock;

pub use interface::*;
pub use mock::MockCluster;
