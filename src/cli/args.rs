//! Command line argument parsing and validation.
//!
//! One clap parser per binary. Options default to what the shell scripts
//! hard-code, so running either tool bare behaves like the script.

use crate::error::CliError;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Run the terminal block generator in a container on the local X display
#[derive(Parser, Debug)]
#[command(
    name = "run_on_docker",
    version,
    about = "Run the terminal block generator in a container on the local X display",
    long_about = "Grants local X11 access (xhost +), then runs the qet_tb image with the current
directory mounted and DISPLAY forwarded.

Usage:
  run_on_docker                      # the application asks for a schematic
  run_on_docker plans/cabinet.qet    # open this schematic
  run_on_docker -odd-name.qet        # paths starting with '-' work too
  run_on_docker -- --dry-run.qet     # ...unless they look like an option

Exit code = container runtime's exit code."
)]
pub struct LauncherArgs {
    /// Schematic (.qet) to open, forwarded to the container unchanged
    #[arg(
        value_name = "SCHEMATIC",
        value_parser = clap::value_parser!(OsString),
        allow_hyphen_values = true
    )]
    pub schematic: Option<OsString>,

    /// Ignored, like the script ignores arguments after the first
    #[arg(hide = true, value_parser = clap::value_parser!(OsString))]
    pub extra: Vec<OsString>,

    /// Image to run instead of the configured one
    #[arg(long, value_name = "NAME", env = "QET_TB_IMAGE")]
    pub image: Option<String>,

    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file
    #[arg(short, long, value_name = "PATH", env = "QET_TB_TOOLS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl LauncherArgs {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if self.image.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(CliError::InvalidArguments {
                reason: "--image cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Build and upload the Python package
#[derive(Parser, Debug)]
#[command(
    name = "publish_package",
    version,
    about = "Build and upload the Python package",
    long_about = "Empties dist/ and build/, builds a source distribution and a wheel, then uploads
everything in dist/.

Every step runs even if the previous one failed, unless --fail-fast is given.

Exit code = upload tool's exit code (or the failing step's with --fail-fast)."
)]
pub struct PublisherArgs {
    /// Stop at the first failing step
    #[arg(long)]
    pub fail_fast: bool,

    /// Repository section of the upload tool's config (e.g. testpypi)
    #[arg(short, long, value_name = "NAME")]
    pub repository: Option<String>,

    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file
    #[arg(short, long, value_name = "PATH", env = "QET_TB_TOOLS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl PublisherArgs {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        if self.repository.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(CliError::InvalidArguments {
                reason: "--repository cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
