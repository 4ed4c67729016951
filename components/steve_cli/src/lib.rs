//! Command-line front end for the steve IR virtual machine.
//!
//! Provides argument parsing, the [`Runtime`] orchestration layer, and
//! the interactive debugger prompt.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod debugger;
pub mod error;
pub mod runtime;

pub use cli::Cli;
pub use debugger::StdinDebugger;
pub use error::{CliError, CliResult};
pub use runtime::Runtime;
