//! Pre-flight validation
//!
//! Runs once before any test work starts: confirms the cluster answers,
//! logs what is about to run and makes sure there is somewhere to put the
//! results. Every failure here is unrecoverable for the run; the caller
//! decides how to exit.

use std::io;
use std::path::Path;

use tracing::{error, info, warn};

use crate::cluster::{ApiEndpoint, ServerVersion, ServerVersionSource};
use crate::config::ArgConfig;
use crate::error::PreflightError;

/// What the pre-flight step found
#[derive(Debug, Clone)]
pub struct PreflightReport {
    /// API server address
    pub host: String,
    /// Version the API server reported
    pub server_version: ServerVersion,
    /// Whether the output directory had to be created
    pub output_dir_created: bool,
}

/// Validate the configuration against a live cluster
///
/// The version query runs first; if it fails only the error is logged and no
/// directory is created.
pub async fn validate_args<C, E>(
    client: &C,
    endpoint: &E,
    cfg: &ArgConfig,
) -> Result<PreflightReport, PreflightError>
where
    C: ServerVersionSource + ?Sized,
    E: ApiEndpoint + ?Sized,
{
    let server_version = client.server_version().await.map_err(|e| {
        error!(error = %e, "Error fetching server version");
        PreflightError::from(e)
    })?;

    let host = endpoint.host();
    for line in summary_lines(&host, &server_version, cfg) {
        info!("{}", line);
    }

    let output_dir_created =
        ensure_output_dir(&cfg.output_dir).map_err(|source| {
            error!(path = ?cfg.output_dir, error = %source, "Error creating output directory");
            PreflightError::OutputDir {
                path: cfg.output_dir.clone(),
                source,
            }
        })?;

    if output_dir_created {
        info!(path = ?cfg.output_dir, "Created output directory");
    }

    Ok(PreflightReport {
        host,
        server_version,
        output_dir_created,
    })
}

/// Banner describing the run, one entry per log line
pub fn summary_lines(host: &str, version: &ServerVersion, cfg: &ArgConfig) -> Vec<String> {
    let mut lines = vec![
        format!("API endpoint : {}", host),
        format!("Server version : {:?}", version),
        format!("Running tests : '{}'", cfg.focus),
    ];
    if !cfg.skip.is_empty() {
        lines.push(format!("Skipping tests : '{}'", cfg.skip));
    }
    lines.push(format!("Using conformance image : '{}'", cfg.conformance_image));
    lines.push(format!("Using busybox image : '{}'", cfg.busybox_image));
    lines.push(format!(
        "Test framework will start '{}' threads and use verbosity '{}'",
        cfg.parallel, cfg.verbosity
    ));
    lines
}

/// Create `path` and any missing parents
///
/// Returns `true` if the directory did not exist before. An existing path is
/// left untouched, even when it is not a directory.
pub fn ensure_output_dir(path: &Path) -> io::Result<bool> {
    if path.exists() {
        if !path.is_dir() {
            warn!(path = ?path, "Output path exists but is not a directory");
        }
        return Ok(false);
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)?;
    Ok(true)
}
