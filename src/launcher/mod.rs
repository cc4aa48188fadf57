//! Container launcher with X11 forwarding.
//!
//! Opens the local X server to clients, then runs the application image with
//! the invoking directory and the X11 socket mounted, so the GUI inside the
//! container draws on the host display.

use anyhow::Context;
use crate::config::LauncherConfig;
use crate::error::Result;
use crate::process::{CommandSpec, Executor};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Builds and runs the two launcher commands.
#[derive(Debug, Clone)]
pub struct ContainerLauncher {
    config: LauncherConfig,
    workdir: PathBuf,
    display: Option<OsString>,
}

impl ContainerLauncher {
    /// Creates a launcher.
    ///
    /// # Arguments
    ///
    /// * `config` - Image, runtime and mount settings
    /// * `workdir` - Host directory mounted into the container
    /// * `display` - Host `DISPLAY`, `None` when unset
    pub fn new(config: LauncherConfig, workdir: PathBuf, display: Option<OsString>) -> Self {
        Self {
            config,
            workdir,
            display,
        }
    }

    /// Creates a launcher for the current directory and `DISPLAY`.
    pub fn from_env(config: LauncherConfig) -> Result<Self> {
        let workdir = std::env::current_dir().context("cannot determine the directory to mount")?;
        let display = std::env::var_os("DISPLAY");
        Ok(Self::new(config, workdir, display))
    }

    /// `xhost +`
    pub fn xhost_command(&self) -> CommandSpec {
        CommandSpec::new(&self.config.xhost_program).args(&self.config.xhost_args)
    }

    /// Container runtime invocation.
    ///
    /// `schematic`, when given, is the final token, byte for byte. Without it
    /// nothing follows the image name.
    pub fn run_command(&self, schematic: Option<&OsStr>) -> CommandSpec {
        let config = &self.config;
        let workdir_mount = volume(&self.workdir, OsStr::new(&config.mount_point));
        let socket_mount = volume(&config.x11_socket, config.x11_socket.as_os_str());

        // Unset expands to empty in the shell; keep that.
        let mut display = OsString::from("DISPLAY=");
        if let Some(value) = &self.display {
            display.push(value);
        }

        let mut cmd = CommandSpec::new(&config.runtime).arg("run");
        if config.interactive {
            cmd = cmd.arg("-it");
        }
        cmd = cmd
            .args(["--rm", "-v"])
            .arg(workdir_mount)
            .arg("-v")
            .arg(socket_mount)
            .arg("-w")
            .arg(&config.mount_point)
            .arg("-e")
            .arg(display)
            .arg(&config.image);

        match schematic {
            Some(path) => cmd.arg(path),
            None => cmd,
        }
    }

    /// Grants X access, then runs the container.
    ///
    /// A failing `xhost` is only logged. Returns the runtime's exit code.
    pub async fn launch<E: Executor>(
        &self,
        executor: &E,
        schematic: Option<&OsStr>,
    ) -> Result<i32> {
        if self.display.is_none() {
            log::warn!("DISPLAY is not set; the application will not be able to open a window");
        }

        let xhost = self.xhost_command();
        match executor.run(&xhost).await {
            Ok(0) => {}
            Ok(code) => log::warn!("{} exited with {}, starting container anyway", xhost, code),
            Err(e) => log::warn!("{}, starting container anyway", e),
        }

        match schematic {
            Some(path) => log::info!("Opening {} in {}", Path::new(path).display(), self.config.image),
            None => log::info!("Starting {} without a schematic", self.config.image),
        }

        let code = executor.run(&self.run_command(schematic)).await?;
        if code != 0 {
            log::warn!("{} exited with {}", self.config.runtime, code);
        }
        Ok(code)
    }
}

/// `host:container` for `-v`, without re-encoding the host path.
fn volume(host: &Path, container: &OsStr) -> OsString {
    let mut spec = host.as_os_str().to_os_string();
    spec.push(":");
    spec.push(container);
    spec
}
