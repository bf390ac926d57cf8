//! Hydrophone
//!
//! Runs the upstream Kubernetes conformance suite against a live cluster.
//! This entry point parses the run configuration, checks the cluster is
//! reachable and prepares the output directory before tests are started.

mod cli;

use std::ffi::OsString;
use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use hydrophone_core::config::{default_output_dir, ArgConfig};
use hydrophone_core::{preflight, ConfigError, PreflightError};
use hydrophone_k8s::K8sClient;

/// Initialize the tracing/logging subsystem
fn init_logging(log_level: &str, json_format: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Resolve the run configuration from the process arguments
fn load_config(args: &[OsString]) -> Result<ArgConfig, ConfigError> {
    let cwd = default_output_dir()?;
    cli::load_args(args, &cwd)
}

/// Connect to the cluster and run the pre-flight checks
async fn run(cfg: &ArgConfig) -> Result<()> {
    let client = K8sClient::new(cfg.kubeconfig.as_deref()).await?;

    let report = preflight::validate_args(&client, &client, cfg).await?;

    info!(
        server_version = %report.server_version,
        output_dir = ?cfg.output_dir,
        env = ?cfg.e2e_env(),
        "Pre-flight checks passed"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<OsString> = std::env::args_os().collect();

    // Usage errors, --help and --version are reported before logging exists
    let cli = match Cli::try_parse_args(&args) {
        Ok(cli) => cli,
        Err(ConfigError::DisplayRequested(text)) => {
            print!("{}", text);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprint!("{}", e);
            return exit_code(e.exit_code());
        }
    };

    // Initialize logging
    init_logging(&cli.log_level, cli.log_json);

    info!(version = env!("CARGO_PKG_VERSION"), "Hydrophone starting");

    let cfg = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return exit_code(e.exit_code());
        }
    };

    if let Err(e) = run(&cfg).await {
        // Pre-flight failures are logged where they happen
        if let Some(preflight_err) = e.downcast_ref::<PreflightError>() {
            return exit_code(preflight_err.exit_code());
        }
        error!("Failed to connect to the cluster: {:#}", e);
        return exit_code(3);
    }

    ExitCode::SUCCESS
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
