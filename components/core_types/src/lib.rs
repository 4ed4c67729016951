//! Core value types and error handling for the steve runtime.
//!
//! This crate provides the foundational types shared by every runtime
//! component: the tagged [`Value`] union, the operator dispatch of
//! [`ops`], and the [`VmError`] family.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of runtime values
//! - [`PointerValue`] - Handle to a garbage-collected cell
//! - [`ListValue`] / [`DictValue`] - Shared, heap-backed containers
//! - [`VmError`] / [`ErrorKind`] - Runtime faults with source lines
//! - [`ops`] - Binary and unary operator semantics
//!
//! # Examples
//!
//! ```
//! use core_types::{ops, Value};
//!
//! let sum = ops::binary_op(&Value::Int(2), &Value::Int(3), "+", 1).unwrap();
//! assert_eq!(sum, Value::Int(5));
//! assert!(sum.is_truthy());
//! assert_eq!(sum.type_tag(), "int");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub mod ops;
mod value;

pub use error::{ErrorKind, VmError, VmResult};
pub use value::{DictValue, ListValue, PointerValue, Value};
