//! Stack-based interpreter for the steve textual IR.
//!
//! The virtual machine fetches decoded instructions, dispatches them
//! against an operand stack and a scope chain, allocates through the
//! garbage collector, calls builtins by name, and optionally consults the
//! JIT fast path for straight-line programs. A debugger harness wraps
//! per-instruction execution with breakpoints and stepping.
//!
//! # Examples
//!
//! ```
//! use builtins::HostContext;
//! use interpreter::VirtualMachine;
//!
//! let (host, output) = HostContext::with_io("");
//! let mut vm = VirtualMachine::with_host(host);
//! vm.load_source("LOAD 2\nLOAD 3\nBINARY_OP +\nPRINT\n").unwrap();
//! vm.execute().unwrap();
//! assert_eq!(output.borrow().as_slice(), ["5"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod debug;
mod dispatch;
mod flow;
mod machine;
mod vm;

pub use debug::{Breakpoint, DebugCommand, DebugInterface, DebugState, ScriptedDebugger};
pub use machine::MachineState;
pub use vm::VirtualMachine;
