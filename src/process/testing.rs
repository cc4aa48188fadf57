//! Executor that records side effects instead of performing them.

use super::{CommandSpec, Executor};
use crate::error::{CliError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Clear(PathBuf),
    Run(CommandSpec),
}

/// Records every call. Commands exit 0 unless [`Self::exit_code`] says otherwise.
#[derive(Default)]
pub struct RecordingExecutor {
    events: Mutex<Vec<Event>>,
    codes: HashMap<String, i32>,
    missing: Vec<String>,
    clear_for_real: bool,
    watched: Vec<PathBuf>,
    snapshots: Mutex<Vec<Vec<usize>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands whose last argument is `token` (or whose program is `token`) exit with `code`.
    pub fn exit_code(mut self, token: &str, code: i32) -> Self {
        self.codes.insert(token.to_string(), code);
        self
    }

    /// `program` behaves as if it were not installed.
    pub fn missing(mut self, program: &str) -> Self {
        self.missing.push(program.to_string());
        self
    }

    /// Actually clear directories, and count entries of `watched` before every run.
    pub fn clearing(mut self, watched: Vec<PathBuf>) -> Self {
        self.clear_for_real = true;
        self.watched = watched;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<CommandSpec> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Run(cmd) => Some(cmd),
                Event::Clear(_) => None,
            })
            .collect()
    }

    /// Entry counts of the watched directories, one row per `run` call.
    pub fn snapshots(&self) -> Vec<Vec<usize>> {
        self.snapshots.lock().unwrap().clone()
    }
}

impl Executor for RecordingExecutor {
    async fn run(&self, command: &CommandSpec) -> Result<i32> {
        let counts = self
            .watched
            .iter()
            .map(|dir| std::fs::read_dir(dir).map(|it| it.count()).unwrap_or(0))
            .collect();
        self.snapshots.lock().unwrap().push(counts);
        self.events.lock().unwrap().push(Event::Run(command.clone()));

        if self.missing.iter().any(|p| command.program() == p.as_str()) {
            return Err(CliError::ProgramNotFound {
                program: command.program().to_string_lossy().into_owned(),
            }
            .into());
        }

        let lookup = |token: &std::ffi::OsStr| token.to_str().and_then(|t| self.codes.get(t));
        let code = lookup(command.last_token())
            .or_else(|| lookup(command.program()))
            .copied()
            .unwrap_or(0);
        Ok(code)
    }

    async fn clear_dir(&self, dir: &Path) -> Result<()> {
        self.events.lock().unwrap().push(Event::Clear(dir.to_path_buf()));
        if self.clear_for_real {
            crate::utils::fs::clear_dir_contents(dir).await?;
        }
        Ok(())
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        crate::utils::fs::list_files(dir).await
    }
}
