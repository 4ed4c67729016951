//! Builtin callables and host services for the steve runtime.
//!
//! This crate provides:
//! - [`BuiltinRegistry`] - name-keyed host callables exposed to the IR's
//!   `CALL` namespace (later registrations overwrite earlier ones)
//! - [`HostContext`] - the explicit per-runtime bundle of host state:
//!   garbage collector, raw memory, file table, console, and stdin
//! - [`Console`] - program-observable output with a capture mode for tests
//! - [`FileTable`] - open file resources mapped to opaque handle ids
//!
//! # Examples
//!
//! ```
//! use builtins::{BuiltinRegistry, HostContext};
//! use core_types::Value;
//!
//! let registry = BuiltinRegistry::with_defaults();
//! let mut host = HostContext::new();
//!
//! let n = registry
//!     .call("int", &mut host, &[Value::Str("42".into())])
//!     .unwrap();
//! assert_eq!(n, Value::Int(42));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod collections;
mod console;
mod convert;
mod file_table;
mod host;
mod io;
mod math;
mod memory;
mod registry;
mod strings;

pub use console::{Console, ConsoleWriter};
pub use file_table::{FileHandle, FileTable};
pub use host::HostContext;
pub use registry::{BuiltinFn, BuiltinRegistry};
