//! External process plumbing.
//!
//! The launcher and publisher only build [`CommandSpec`]s and hand them to an
//! [`Executor`]. [`SystemExecutor`] runs them; [`DryRunExecutor`] prints them.

mod command;
mod executor;
#[cfg(test)]
pub(crate) mod testing;

pub use command::{CommandSpec, exit_code_of};
pub use executor::{DryRunExecutor, Executor, SystemExecutor};
