//! Memory manager - managed heap and garbage collection.
//!
//! This component provides:
//! - Managed object cells with type tags and mark bits
//! - A handle-keyed mark-and-sweep garbage collector over an explicit
//!   reference graph
//! - A raw memory table backing the IR's malloc/free opcodes
//!
//! The collector is stop-the-world relative to the interpreter: it only
//! runs when explicitly invoked, and nothing mutates the heap mid-dispatch.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod gc;
mod object;
mod raw;

pub use gc::GarbageCollector;
pub use object::ManagedObject;
pub use raw::RawMemory;
