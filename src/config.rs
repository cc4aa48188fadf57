//! Configuration for both tools.
//!
//! Every value defaults to the constant the original scripts hard-code, so a
//! missing config file reproduces them exactly. A file only needs the keys it
//! wants to change:
//!
//! ```toml
//! [launcher]
//! runtime = "podman"
//!
//! [publisher]
//! clean_dirs = ["dist", "build", "qet_tb_generator.egg-info"]
//! ```

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "qet_tb_tools";

/// File name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// `[launcher]` table
    pub launcher: LauncherConfig,

    /// `[publisher]` table
    pub publisher: PublisherConfig,
}

/// Settings for `run_on_docker`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// Container runtime executable
    pub runtime: String,

    /// Image to run
    pub image: String,

    /// Where the invoking directory is mounted inside the container.
    ///
    /// Also used as the container working directory.
    pub mount_point: String,

    /// Host X11 socket directory, mounted at the same path
    pub x11_socket: PathBuf,

    /// Program that opens the X server to clients
    pub xhost_program: String,

    /// Arguments for [`Self::xhost_program`]
    pub xhost_args: Vec<String>,

    /// Pass `-it` to the runtime
    pub interactive: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            runtime: "docker".to_string(),
            image: "qet_tb".to_string(),
            mount_point: "/qet".to_string(),
            x11_socket: PathBuf::from("/tmp/.X11-unix"),
            xhost_program: "xhost".to_string(),
            xhost_args: vec!["+".to_string()],
            interactive: true,
        }
    }
}

/// Settings for `publish_package`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublisherConfig {
    /// Python interpreter used to run the setup script
    pub python: String,

    /// Setup script, relative to the project directory
    pub setup_script: PathBuf,

    /// Directories whose contents are deleted before building
    pub clean_dirs: Vec<PathBuf>,

    /// Directory the builds write artifacts to
    pub dist_dir: PathBuf,

    /// Upload tool executable
    pub upload_program: String,

    /// Arguments placed before the artifact list
    pub upload_args: Vec<String>,

    /// Stop at the first failing step
    pub fail_fast: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            setup_script: PathBuf::from("setup.py"),
            clean_dirs: vec![PathBuf::from("dist"), PathBuf::from("build")],
            dist_dir: PathBuf::from("dist"),
            upload_program: "twine".to_string(),
            upload_args: vec!["upload".to_string()],
            fail_fast: false,
        }
    }
}

impl ToolsConfig {
    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// if present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => {
                    log::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::parse(&path, &text)
    }

    /// Parses and validates a config document. `path` is only used in errors.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would produce a nonsensical command line.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let required = [
            ("launcher.runtime", self.launcher.runtime.as_str()),
            ("launcher.image", self.launcher.image.as_str()),
            ("launcher.xhost_program", self.launcher.xhost_program.as_str()),
            ("publisher.python", self.publisher.python.as_str()),
            ("publisher.upload_program", self.publisher.upload_program.as_str()),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: key.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if !self.launcher.mount_point.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "launcher.mount_point".to_string(),
                reason: format!(
                    "container path must be absolute, got `{}`",
                    self.launcher.mount_point
                ),
            });
        }

        if self.publisher.dist_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                key: "publisher.dist_dir".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// `<config dir>/qet_tb_tools/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
