//! Package publisher: clean, build sdist, build wheel, upload.
//!
//! Every step runs even when the one before it failed, unless fail-fast is
//! enabled. The overall exit code is that of the last step attempted.

mod artifacts;

pub use artifacts::upload_arguments;

use crate::config::PublisherConfig;
use crate::process::{CommandSpec, Executor};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// One step of a publish run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    Clean,
    BuildSdist,
    BuildWheel,
    Upload,
}

impl PublishStep {
    /// All steps, in the order they run.
    pub const ALL: [PublishStep; 4] = [
        PublishStep::Clean,
        PublishStep::BuildSdist,
        PublishStep::BuildWheel,
        PublishStep::Upload,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PublishStep::Clean => "clean",
            PublishStep::BuildSdist => "sdist",
            PublishStep::BuildWheel => "bdist_wheel",
            PublishStep::Upload => "upload",
        }
    }
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exit code of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: PublishStep,
    pub exit_code: i32,
}

impl StepOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Result of a publish run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Steps attempted, in order
    pub outcomes: Vec<StepOutcome>,

    /// Fail-fast skipped the remaining steps
    pub stopped_early: bool,
}

impl PublishReport {
    /// Exit code of the last step attempted.
    pub fn exit_code(&self) -> i32 {
        self.outcomes.last().map(|o| o.exit_code).unwrap_or(0)
    }

    pub fn failed_steps(&self) -> Vec<PublishStep> {
        self.outcomes
            .iter()
            .filter(|o| !o.succeeded())
            .map(|o| o.step)
            .collect()
    }
}

/// Runs the publish steps for one project directory.
#[derive(Debug, Clone)]
pub struct Publisher {
    config: PublisherConfig,
    project_dir: PathBuf,
    repository: Option<String>,
}

impl Publisher {
    /// Creates a publisher.
    ///
    /// # Arguments
    ///
    /// * `config` - Tool names and directories
    /// * `project_dir` - Directory containing the setup script
    pub fn new(config: PublisherConfig, project_dir: PathBuf) -> Self {
        Self {
            config,
            project_dir,
            repository: None,
        }
    }

    /// Uploads to a named repository from the upload tool's own configuration.
    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository;
        self
    }

    /// Stops at the first failing step.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.config.fail_fast = fail_fast;
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Steps a run will attempt, without fail-fast cut-off.
    pub fn plan(&self) -> Vec<PublishStep> {
        PublishStep::ALL.to_vec()
    }

    /// Directories emptied by the clean step.
    pub fn clean_dirs(&self) -> Vec<PathBuf> {
        self.config
            .clean_dirs
            .iter()
            .map(|dir| self.project_dir.join(dir))
            .collect()
    }

    fn setup_command(&self, target: &str) -> CommandSpec {
        CommandSpec::new(&self.config.python)
            .arg(self.config.setup_script.as_os_str())
            .arg(target)
            .current_dir(&self.project_dir)
    }

    /// `python3 setup.py sdist`
    pub fn sdist_command(&self) -> CommandSpec {
        self.setup_command("sdist")
    }

    /// `python3 setup.py bdist_wheel`
    pub fn wheel_command(&self) -> CommandSpec {
        self.setup_command("bdist_wheel")
    }

    /// `twine upload [--repository NAME] <artifacts>`
    pub fn upload_command(&self, artifacts: &[OsString]) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.config.upload_program).args(&self.config.upload_args);
        if let Some(repository) = &self.repository {
            cmd = cmd.arg("--repository").arg(repository);
        }
        cmd.args(artifacts).current_dir(&self.project_dir)
    }

    /// Empties every clean dir. All are attempted; any failure makes the step exit 1.
    pub async fn clean<E: Executor>(&self, executor: &E) -> i32 {
        let mut code = 0;
        for dir in self.clean_dirs() {
            if let Err(e) = executor.clear_dir(&dir).await {
                log::error!("Failed to clear {}: {}", dir.display(), e);
                code = 1;
            }
        }
        code
    }

    pub async fn build_sdist<E: Executor>(&self, executor: &E) -> i32 {
        run_reporting(executor, &self.sdist_command()).await
    }

    pub async fn build_wheel<E: Executor>(&self, executor: &E) -> i32 {
        run_reporting(executor, &self.wheel_command()).await
    }

    /// Uploads whatever is in the dist dir at this point.
    pub async fn upload<E: Executor>(&self, executor: &E) -> i32 {
        let artifacts =
            match upload_arguments(executor, &self.project_dir, &self.config.dist_dir).await {
                Ok(artifacts) => artifacts,
                Err(e) => {
                    log::error!("Failed to list {}: {}", self.config.dist_dir.display(), e);
                    return 1;
                }
            };
        run_reporting(executor, &self.upload_command(&artifacts)).await
    }

    pub async fn run_step<E: Executor>(&self, executor: &E, step: PublishStep) -> i32 {
        match step {
            PublishStep::Clean => self.clean(executor).await,
            PublishStep::BuildSdist => self.build_sdist(executor).await,
            PublishStep::BuildWheel => self.build_wheel(executor).await,
            PublishStep::Upload => self.upload(executor).await,
        }
    }

    /// Runs every step in order.
    pub async fn publish<E: Executor>(&self, executor: &E) -> PublishReport {
        let setup_script = self.project_dir.join(&self.config.setup_script);
        if !setup_script.is_file() {
            log::warn!("{} not found, the builds will likely fail", setup_script.display());
        }

        let mut report = PublishReport::default();
        for step in self.plan() {
            log::info!("Step {}", step);
            let exit_code = self.run_step(executor, step).await;
            report.outcomes.push(StepOutcome { step, exit_code });

            if exit_code != 0 {
                log::warn!("Step {} exited with {}", step, exit_code);
                if self.config.fail_fast {
                    report.stopped_early = true;
                    break;
                }
            }
        }
        report
    }
}

/// Runs a command, turning spawn failures into shell exit codes.
async fn run_reporting<E: Executor>(executor: &E, command: &CommandSpec) -> i32 {
    match executor.run(command).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            e.exit_code()
        }
    }
}
