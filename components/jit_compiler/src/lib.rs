//! Optional fast path for straight-line programs.
//!
//! The interpreter may consult a pluggable compiler that takes the
//! decoded instruction vector and, on success, yields an invocable
//! artifact returning a 64-bit integer. Programs containing control flow
//! (`FUNC`, `IF`, `WHILE`, `CALL`, `GOTO`) are never eligible; anything
//! the compiler cannot prove effect-free fails compilation, and the
//! runtime falls back to the interpreter. The fast path must never
//! produce an observably different result than the interpreter for the
//! programs it accepts.
//!
//! # Examples
//!
//! ```
//! use ir_system::decode;
//! use jit_compiler::{is_eligible, BaselineJit};
//!
//! let program = decode("LOAD 2\nLOAD 3\nBINARY_OP +\n");
//! assert!(is_eligible(&program));
//!
//! let mut jit = BaselineJit::new();
//! let compiled = jit.compile(&program).unwrap();
//! assert_eq!(compiled.execute().unwrap(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod baseline;
mod compiled;

pub use baseline::{is_eligible, BaselineJit};
pub use compiled::{CompiledProgram, JitError};
