//! Executors: the seam between planned commands and the operating system.

use super::command::{CommandSpec, exit_code_of};
use crate::error::{CliError, Result};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::process::Command;

/// Carries out the side effects of the launcher and publisher.
pub trait Executor {
    /// Runs `command` to completion with inherited stdio and returns its exit code.
    fn run(&self, command: &CommandSpec) -> impl Future<Output = Result<i32>>;

    /// Deletes the contents of `dir`, tolerating its absence.
    fn clear_dir(&self, dir: &Path) -> impl Future<Output = Result<()>>;

    /// Files the shell would match for `dir/*`.
    fn list_files(&self, dir: &Path) -> impl Future<Output = Result<Vec<PathBuf>>>;
}

/// Executes for real.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    async fn run(&self, command: &CommandSpec) -> Result<i32> {
        let cwd = match command.working_dir() {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir()?,
        };

        let program = which::which_in(command.program(), std::env::var_os("PATH"), &cwd)
            .map_err(|e| {
                log::debug!("Lookup of {:?} failed: {}", command.program(), e);
                CliError::ProgramNotFound {
                    program: command.program().to_string_lossy().into_owned(),
                }
            })?;
        log::debug!("Resolved {:?} to {}", command.program(), program.display());
        log::info!("Running: {}", command);

        let mut child = Command::new(&program);
        child.args(command.arguments());
        if let Some(dir) = command.working_dir() {
            child.current_dir(dir);
        }

        let status = child.status().await.map_err(|e| CliError::ExecutionFailed {
            command: command.render(),
            reason: e.to_string(),
        })?;

        let code = exit_code_of(status);
        log::debug!("{:?} exited with {}", command.program(), code);
        Ok(code)
    }

    async fn clear_dir(&self, dir: &Path) -> Result<()> {
        let removed = crate::utils::fs::clear_dir_contents(dir).await?;
        log::info!("Cleared {} ({} entries removed)", dir.display(), removed);
        Ok(())
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        crate::utils::fs::list_files(dir).await
    }
}

/// Prints what would happen, one shell line per side effect, and does nothing.
///
/// Every command "succeeds" with exit code 0 and no directory has files.
pub struct DryRunExecutor<W: Write = std::io::Stdout> {
    out: Mutex<W>,
}

impl DryRunExecutor {
    /// Prints to stdout.
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl<W: Write> DryRunExecutor<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the writer, e.g. to inspect a buffer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, line: &str) -> Result<()> {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

impl<W: Write> Executor for DryRunExecutor<W> {
    async fn run(&self, command: &CommandSpec) -> Result<i32> {
        self.emit(&command.render())?;
        Ok(0)
    }

    async fn clear_dir(&self, dir: &Path) -> Result<()> {
        // Glob stays outside the quotes so the line is still valid shell.
        let quoted = shell_words::quote(&dir.to_string_lossy()).into_owned();
        self.emit(&format!("rm -rf {}/*", quoted))
    }

    /// Nothing has been built in a dry run.
    async fn list_files(&self, _dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dry_run_prints_commands_and_reports_success() {
        let executor = DryRunExecutor::with_writer(Vec::new());
        let code = executor
            .run(&CommandSpec::new("twine").args(["upload", "dist/a b.whl"]))
            .await
            .unwrap();
        executor.clear_dir(Path::new("build")).await.unwrap();
        executor.clear_dir(Path::new("my dist")).await.unwrap();

        assert_eq!(code, 0);
        let printed = String::from_utf8(executor.into_inner()).unwrap();
        assert_eq!(
            printed,
            "twine upload 'dist/a b.whl'\nrm -rf build/*\nrm -rf 'my dist'/*\n"
        );
    }

    #[tokio::test]
    async fn dry_run_does_not_touch_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("artifact"), b"x").unwrap();

        let executor = DryRunExecutor::with_writer(Vec::new());
        executor.clear_dir(dir.path()).await.unwrap();

        assert!(dir.path().join("artifact").exists());
    }

    #[tokio::test]
    async fn missing_program_is_reported_as_not_found() {
        let err = SystemExecutor
            .run(&CommandSpec::new("qet-tb-definitely-not-installed"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 127);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_executor_passes_exit_codes_through() {
        let ok = SystemExecutor.run(&CommandSpec::new("true")).await.unwrap();
        let failed = SystemExecutor
            .run(&CommandSpec::new("sh").args(["-c", "exit 7"]))
            .await
            .unwrap();

        assert_eq!(ok, 0);
        assert_eq!(failed, 7);
    }

    // Some unix filesystems refuse non-UTF-8 names; Linux ones accept them.
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn system_executor_passes_raw_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let code = SystemExecutor
            .run(
                &CommandSpec::new("touch")
                    .arg(OsStr::from_bytes(b"plan\xff.qet"))
                    .current_dir(dir.path()),
            )
            .await
            .unwrap();

        assert_eq!(code, 0);
        assert!(dir.path().join(OsStr::from_bytes(b"plan\xff.qet")).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_executor_honours_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let code = SystemExecutor
            .run(
                &CommandSpec::new("sh")
                    .args(["-c", "touch marker"])
                    .current_dir(dir.path()),
            )
            .await
            .unwrap();

        assert_eq!(code, 0);
        assert!(dir.path().join("marker").exists());
    }
}
