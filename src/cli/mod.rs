//! Command line entry points for both tools.
//!
//! Loads configuration, applies command line overrides, picks the real or
//! dry-run executor, and returns the exit code the binary should report.

mod args;

pub use args::{LauncherArgs, PublisherArgs};

use anyhow::Context;
use crate::config::ToolsConfig;
use crate::error::Result;
use crate::launcher::ContainerLauncher;
use crate::process::{DryRunExecutor, SystemExecutor};
use crate::publisher::Publisher;

/// `run_on_docker` entry point
pub async fn run_launcher(args: LauncherArgs) -> Result<i32> {
    args.validate()?;

    let mut config = ToolsConfig::load(args.config.as_deref())?.launcher;
    if let Some(image) = args.image {
        config.image = image;
    }
    if !args.extra.is_empty() {
        let extra: Vec<_> = args.extra.iter().map(|a| a.to_string_lossy()).collect();
        log::warn!("Ignoring extra arguments: {}", shell_words::join(extra));
    }

    let launcher = ContainerLauncher::from_env(config)?;
    let schematic = args.schematic.as_deref();

    if args.dry_run {
        launcher.launch(&DryRunExecutor::stdout(), schematic).await
    } else {
        launcher.launch(&SystemExecutor, schematic).await
    }
}

/// `publish_package` entry point
pub async fn run_publisher(args: PublisherArgs) -> Result<i32> {
    args.validate()?;

    let config = ToolsConfig::load(args.config.as_deref())?.publisher;
    let fail_fast = args.fail_fast || config.fail_fast;
    let project_dir = std::env::current_dir().context("cannot determine the project directory")?;
    let publisher = Publisher::new(config, project_dir)
        .with_repository(args.repository)
        .with_fail_fast(fail_fast);
    log::info!("Publishing from {}", publisher.project_dir().display());

    let report = if args.dry_run {
        publisher.publish(&DryRunExecutor::stdout()).await
    } else {
        publisher.publish(&SystemExecutor).await
    };

    let failed = report.failed_steps();
    if !failed.is_empty() {
        let names: Vec<_> = failed.iter().map(|s| s.name()).collect();
        log::warn!("Failed steps: {}", names.join(", "));
    }
    if report.stopped_early {
        log::warn!("Stopped early (--fail-fast)");
    }

    Ok(report.exit_code())
}
