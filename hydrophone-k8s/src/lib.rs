//! Hydrophone Kubernetes Integration
//!
//! Provides the Kubernetes client used to reach the cluster under test.

pub mod client;

pub use client::K8sClient;
