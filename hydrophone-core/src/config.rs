//! Runner configuration
//!
//! [`ArgConfig`] is built once from the command line and is read-only after
//! that. It is handed to the pre-flight step and then to the test engine.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Conformance image used when `--conformance-image` is not given
pub const DEFAULT_CONFORMANCE_IMAGE: &str = "registry.k8s.io/conformance:v1.28.0";

/// Busybox image used when `--busybox-image` is not given
pub const DEFAULT_BUSYBOX_IMAGE: &str = "registry.k8s.io/e2e-test-images/busybox:1.36.1-1";

/// Default number of test framework threads
pub const DEFAULT_PARALLEL: u32 = 1;

/// Default test framework verbosity
pub const DEFAULT_VERBOSITY: i32 = 4;

/// Arguments the runner was started with
///
/// Focus and skip are passed to the test framework verbatim; their regular
/// expression syntax is the framework's to interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgConfig {
    /// Tests to run, e.g. `sig-auth` or `[Conformance]`. Exported as `E2E_FOCUS`.
    pub focus: String,

    /// Tests to skip. Exported as `E2E_SKIP` when set.
    pub skip: String,

    /// Conformance container image
    pub conformance_image: String,

    /// Busybox image used by test workloads
    pub busybox_image: String,

    /// Path to the kubeconfig file; `None` means infer from the environment
    pub kubeconfig: Option<PathBuf>,

    /// Test framework threads. Exported as `E2E_PARALLEL`.
    pub parallel: u32,

    /// Test framework verbosity. Exported as `E2E_VERBOSITY`.
    pub verbosity: i32,

    /// Where `e2e.log` and `junit_01.xml` are written
    pub output_dir: PathBuf,
}

impl ArgConfig {
    /// Create a configuration with every optional field at its default
    pub fn new(focus: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            focus: focus.into(),
            skip: String::new(),
            conformance_image: DEFAULT_CONFORMANCE_IMAGE.to_string(),
            busybox_image: DEFAULT_BUSYBOX_IMAGE.to_string(),
            kubeconfig: None,
            parallel: DEFAULT_PARALLEL,
            verbosity: DEFAULT_VERBOSITY,
            output_dir: output_dir.into(),
        }
    }

    /// Check the invariants a usable configuration must hold
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.focus.is_empty() {
            return Err(ConfigError::MissingFocus);
        }
        if self.parallel == 0 {
            return Err(ConfigError::InvalidArgs(
                "--parallel must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the test framework should run with more than one worker
    pub fn parallel_enabled(&self) -> bool {
        self.parallel > 1
    }

    /// Environment handed to the conformance container
    pub fn e2e_env(&self) -> Vec<(&'static str, String)> {
        let mut env = vec![("E2E_FOCUS", self.focus.clone())];
        if !self.skip.is_empty() {
            env.push(("E2E_SKIP", self.skip.clone()));
        }
        env.push(("E2E_PARALLEL", self.parallel.to_string()));
        env.push(("E2E_VERBOSITY", self.verbosity.to_string()));
        env
    }
}

/// Default output directory: the current working directory
pub fn default_output_dir() -> Result<PathBuf, ConfigError> {
    std::env::current_dir().map_err(ConfigError::WorkingDir)
}
