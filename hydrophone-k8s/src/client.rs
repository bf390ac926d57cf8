//! Kubernetes Client wrapper
//!
//! Provides a simplified interface to the Kubernetes API.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::{debug, info};

use hydrophone_core::cluster::{ApiEndpoint, ClusterError, ServerVersion, ServerVersionSource};

/// Kubernetes client wrapper
pub struct K8sClient {
    client: Client,
    config: Config,
}

impl K8sClient {
    /// Create a client from an explicit kubeconfig, or infer one
    ///
    /// Without a path this follows the usual lookup: `KUBECONFIG`, then
    /// `~/.kube/config`, then the in-cluster service account.
    pub async fn new(kubeconfig: Option<&Path>) -> Result<Self> {
        let config = match kubeconfig {
            Some(path) => {
                debug!(path = ?path, "Loading kubeconfig");
                let kubeconfig = Kubeconfig::read_from(path)
                    .with_context(|| format!("Failed to read kubeconfig: {:?}", path))?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .with_context(|| format!("Failed to load kubeconfig: {:?}", path))?
            }
            None => Config::infer()
                .await
                .context("Failed to infer Kubernetes configuration")?,
        };

        Self::with_config(config)
    }

    /// Create a new K8s client with custom config
    pub fn with_config(config: Config) -> Result<Self> {
        let client = Client::try_from(config.clone())
            .context("Failed to create Kubernetes client from config")?;

        info!(host = %render_host(&config), "Kubernetes client configured");
        Ok(Self { client, config })
    }

    /// Get the underlying kube client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the resolved client configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[async_trait]
impl ServerVersionSource for K8sClient {
    async fn server_version(&self) -> Result<ServerVersion, ClusterError> {
        let info = self
            .client
            .apiserver_version()
            .await
            .map_err(to_cluster_error)?;
        Ok(to_server_version(info))
    }
}

impl ApiEndpoint for K8sClient {
    fn host(&self) -> String {
        render_host(&self.config)
    }
}

/// API server address without the trailing slash `http::Uri` adds
fn render_host(config: &Config) -> String {
    config.cluster_url.to_string().trim_end_matches('/').to_string()
}

fn to_server_version(info: Info) -> ServerVersion {
    ServerVersion {
        major: info.major,
        minor: info.minor,
        git_version: info.git_version,
        git_commit: info.git_commit,
        git_tree_state: info.git_tree_state,
        build_date: info.build_date,
        go_version: info.go_version,
        compiler: info.compiler,
        platform: info.platform,
    }
}

fn to_cluster_error(err: kube::Error) -> ClusterError {
    match err {
        kube::Error::Api(resp) => ClusterError::Api(format!("{} ({})", resp.message, resp.code)),
        kube::Error::HyperError(e) => ClusterError::Unreachable(e.to_string()),
        kube::Error::Service(e) => ClusterError::Unreachable(e.to_string()),
        other => ClusterError::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(url: &str) -> Config {
        Config::new(url.parse().unwrap())
    }

    #[test]
    fn test_render_host_strips_trailing_slash() {
        let config = test_config("https://10.0.0.1:6443");
        assert_eq!(render_host(&config), "https://10.0.0.1:6443");

        let config = test_config("https://api.example.com:6443/");
        assert_eq!(render_host(&config), "https://api.example.com:6443");
    }

    #[test]
    fn test_to_server_version() {
        let info = Info {
            major: "1".to_string(),
            minor: "28".to_string(),
            git_version: "v1.28.0".to_string(),
            git_commit: "855e7c48de7388eb330da0f8d9d2394ee818fb8d".to_string(),
            git_tree_state: "clean".to_string(),
            build_date: "2023-08-15T10:20:15Z".to_string(),
            go_version: "go1.20.7".to_string(),
            compiler: "gc".to_string(),
            platform: "linux/amd64".to_string(),
        };

        let version = to_server_version(info);
        assert_eq!(version.to_string(), "v1.28.0");
        assert_eq!(version.minor, "28");
        assert_eq!(version.platform, "linux/amd64");
    }

    #[test]
    fn test_api_error_mapping() {
        let err = kube::Error::Api(kube::error::ErrorResponse {
            status: "Failure".to_string(),
            message: "forbidden".to_string(),
            reason: "Forbidden".to_string(),
            code: 403,
        });
        assert!(matches!(to_cluster_error(err), ClusterError::Api(msg) if msg.contains("403")));
    }

    #[tokio::test]
    async fn test_missing_kubeconfig_is_an_error() {
        let result = K8sClient::new(Some(Path::new("/nonexistent/kubeconfig"))).await;
        assert!(result.is_err());
    }
}
