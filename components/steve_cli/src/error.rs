//! Error types for the CLI.

use core_types::VmError;
use std::fmt;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// File I/O error.
    Io(std::io::Error),

    /// The IR text could not be loaded.
    Load(String),

    /// Execution failure reported by the virtual machine.
    Vm(VmError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "File error: {}", e),
            CliError::Load(s) => write!(f, "Load error: {}", s),
            CliError::Vm(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Vm(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<VmError> for CliError {
    fn from(err: VmError) -> Self {
        CliError::Vm(err)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
