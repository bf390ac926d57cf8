//! CLI argument parsing for Hydrophone

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;

use hydrophone_core::config::{
    ArgConfig, DEFAULT_BUSYBOX_IMAGE, DEFAULT_CONFORMANCE_IMAGE, DEFAULT_PARALLEL,
    DEFAULT_VERBOSITY,
};
use hydrophone_core::ConfigError;

/// Hydrophone - run Kubernetes conformance tests against a live cluster
#[derive(Debug, Parser)]
#[command(name = "hydrophone")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Run a specific e2e test, e.g. sig-auth. Allows regular expressions.
    #[arg(long, default_value = "")]
    pub focus: String,

    /// Skip specific tests. Allows regular expressions.
    #[arg(long, default_value = "")]
    pub skip: String,

    /// Conformance container image of your choice
    #[arg(long, default_value = DEFAULT_CONFORMANCE_IMAGE)]
    pub conformance_image: String,

    /// Alternate busybox container image
    #[arg(long, default_value = DEFAULT_BUSYBOX_IMAGE)]
    pub busybox_image: String,

    /// Path to the kubeconfig file
    #[arg(long, default_value = "")]
    pub kubeconfig: String,

    /// Number of parallel threads in the test framework
    #[arg(
        long,
        default_value_t = DEFAULT_PARALLEL,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub parallel: u32,

    /// Verbosity of the test framework
    #[arg(long, default_value_t = DEFAULT_VERBOSITY, allow_negative_numbers = true)]
    pub verbosity: i32,

    /// Directory for logs and results (defaults to the current directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "HYDROPHONE_LOG_LEVEL")]
    pub log_level: String,

    /// Output logs in JSON format
    #[arg(long, default_value = "false", env = "HYDROPHONE_LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    /// Parse an argument vector without exiting the process
    ///
    /// `--help` and `--version` come back as [`ConfigError::DisplayRequested`]
    /// carrying clap's rendered output.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|e| {
            let rendered = e.render().to_string();
            match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    ConfigError::DisplayRequested(rendered)
                }
                _ => ConfigError::InvalidArgs(rendered),
            }
        })
    }

    /// Build the runner configuration from the parsed flags
    ///
    /// `cwd` is used when `--output-dir` was not given. Fails if the focus
    /// expression is missing.
    pub fn to_arg_config(&self, cwd: &Path) -> Result<ArgConfig, ConfigError> {
        let cfg = ArgConfig {
            focus: self.focus.clone(),
            skip: self.skip.clone(),
            conformance_image: self.conformance_image.clone(),
            busybox_image: self.busybox_image.clone(),
            kubeconfig: (!self.kubeconfig.is_empty()).then(|| PathBuf::from(&self.kubeconfig)),
            parallel: self.parallel,
            verbosity: self.verbosity,
            output_dir: self.output_dir.clone().unwrap_or_else(|| cwd.to_path_buf()),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Turn an argument vector into the runner configuration
///
/// `cwd` is the default output directory. Nothing global is read or written.
pub fn load_args<I, T>(args: I, cwd: &Path) -> Result<ArgConfig, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_args(args)?.to_arg_config(cwd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(args: &[&str]) -> Result<ArgConfig, ConfigError> {
        load_args(args, Path::new("/work"))
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["hydrophone"]).unwrap();
        assert_eq!(cli.focus, "");
        assert_eq!(cli.skip, "");
        assert_eq!(cli.conformance_image, DEFAULT_CONFORMANCE_IMAGE);
        assert_eq!(cli.busybox_image, DEFAULT_BUSYBOX_IMAGE);
        assert_eq!(cli.kubeconfig, "");
        assert_eq!(cli.parallel, 1);
        assert_eq!(cli.verbosity, 4);
        assert!(cli.output_dir.is_none());
        assert_eq!(cli.log_level, "info");
        assert!(!cli.log_json);
    }

    #[test]
    fn test_missing_focus() {
        assert!(matches!(load(&["hydrophone"]), Err(ConfigError::MissingFocus)));
        assert!(matches!(
            load(&["hydrophone", "--focus="]),
            Err(ConfigError::MissingFocus)
        ));
        assert!(matches!(
            load(&["hydrophone", "--skip", "Serial", "--parallel", "4"]),
            Err(ConfigError::MissingFocus)
        ));
    }

    #[test]
    fn test_focus_only_uses_defaults() {
        let cfg = load(&["hydrophone", "--focus=[Conformance]"]).unwrap();
        assert_eq!(cfg, ArgConfig::new("[Conformance]", "/work"));
    }

    #[test]
    fn test_all_flags() {
        let cfg = load(&[
            "hydrophone",
            "--focus",
            "sig-auth",
            "--skip",
            "Serial|Disruptive",
            "--conformance-image",
            "my.registry/conformance:v1.29.0",
            "--busybox-image=my.registry/busybox:1.36",
            "--kubeconfig",
            "/home/me/.kube/config",
            "--parallel",
            "8",
            "--verbosity=2",
            "--output-dir",
            "/tmp/results",
        ])
        .unwrap();

        assert_eq!(cfg.focus, "sig-auth");
        assert_eq!(cfg.skip, "Serial|Disruptive");
        assert_eq!(cfg.conformance_image, "my.registry/conformance:v1.29.0");
        assert_eq!(cfg.busybox_image, "my.registry/busybox:1.36");
        assert_eq!(cfg.kubeconfig, Some(PathBuf::from("/home/me/.kube/config")));
        assert_eq!(cfg.parallel, 8);
        assert_eq!(cfg.verbosity, 2);
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/results"));
    }

    #[test]
    fn test_empty_kubeconfig_means_infer() {
        let cfg = load(&["hydrophone", "--focus", "sig-apps", "--kubeconfig="]).unwrap();
        assert!(cfg.kubeconfig.is_none());
    }

    #[test]
    fn test_parallel_must_be_positive() {
        assert!(Cli::try_parse_from(["hydrophone", "--focus", "x", "--parallel", "0"]).is_err());
        assert!(Cli::try_parse_from(["hydrophone", "--focus", "x", "--parallel", "-2"]).is_err());
        assert!(Cli::try_parse_from(["hydrophone", "--focus", "x", "--parallel", "two"]).is_err());
    }

    #[test]
    fn test_focus_syntax_is_not_checked() {
        let cfg = load(&["hydrophone", "--focus", r"\Q[sig-apps]\E"]).unwrap();
        assert_eq!(cfg.focus, r"\Q[sig-apps]\E");
    }

    #[test]
    fn test_negative_verbosity() {
        let cfg = load(&["hydrophone", "--focus", "x", "--verbosity", "-1"]).unwrap();
        assert_eq!(cfg.verbosity, -1);
    }

    #[test]
    fn test_usage_errors_are_config_errors() {
        match load(&["hydrophone", "--focus", "x", "--parallel", "0"]) {
            Err(ConfigError::InvalidArgs(msg)) => assert!(msg.contains("--parallel")),
            other => panic!("unexpected result: {:?}", other),
        }
        match load(&["hydrophone", "--focus", "x", "--no-such-flag"]) {
            Err(e @ ConfigError::InvalidArgs(_)) => assert_eq!(e.exit_code(), 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_help_and_version_are_not_failures() {
        match load(&["hydrophone", "--help"]) {
            Err(e @ ConfigError::DisplayRequested(_)) => {
                assert_eq!(e.exit_code(), 0);
                assert!(e.to_string().contains("--focus"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            load(&["hydrophone", "--version"]),
            Err(ConfigError::DisplayRequested(_))
        ));
    }
}
