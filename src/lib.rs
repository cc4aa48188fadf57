//! Helper tools for the QElectroTech terminal block generator.
//!
//! - `run_on_docker`: runs the application image with X11 forwarding
//! - `publish_package`: cleans, builds and uploads the Python package
//!
//! Both only orchestrate external programs. Their exit codes follow the
//! shell conventions of the scripts they replace.

pub mod cli;
pub mod config;
pub mod error;
pub mod launcher;
pub mod process;
pub mod publisher;
pub mod utils;

// Re-export commonly used types
pub use error::{CliError, ConfigError, Result, ToolsError};
