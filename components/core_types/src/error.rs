//! Runtime error types.
//!
//! Every fault the runtime can raise is a [`VmError`]: a kind, a message,
//! and an optional source line from the IR that triggered it.

use std::fmt;

/// The kind of runtime fault.
///
/// The four kinds mirror how the interpreter classifies failures: domain
/// faults, operator shape mismatches, stack/operand access violations, and
/// allocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Domain-level fault: division by zero, undefined label or function,
    /// an explicit THROW, dereference of a null pointer.
    Runtime,
    /// Operator applied to incompatible value shapes.
    Type,
    /// Stack underflow, missing operand, out-of-bounds access.
    Access,
    /// Allocation failure.
    Memory,
}

impl ErrorKind {
    /// Human-readable prefix used when rendering diagnostics.
    pub fn prefix(self) -> &'static str {
        match self {
            ErrorKind::Runtime => "Runtime Error",
            ErrorKind::Type => "Type Error",
            ErrorKind::Access => "Access Error",
            ErrorKind::Memory => "Memory Error",
        }
    }
}

/// A runtime fault with message and optional source line.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, VmError};
///
/// let err = VmError::runtime("Division by zero error").with_line(3);
/// assert_eq!(err.kind, ErrorKind::Runtime);
/// assert_eq!(err.line, Some(3));
/// assert!(err.to_string().contains("Division by zero"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmError {
    /// The fault classification.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Source line in the IR text, when known (1-based).
    pub line: Option<u32>,
}

impl VmError {
    /// Create an error of the given kind with no source position.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    /// Create a [`ErrorKind::Runtime`] error.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }

    /// Create a [`ErrorKind::Type`] error.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    /// Create a [`ErrorKind::Access`] error.
    pub fn access(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Access, message)
    }

    /// Create a [`ErrorKind::Memory`] error.
    pub fn memory(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Memory, message)
    }

    /// Attach the IR source line the fault occurred on.
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.prefix(), self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        Ok(())
    }
}

impl std::error::Error for VmError {}

/// Result alias used throughout the runtime.
pub type VmResult<T> = Result<T, VmError>;
