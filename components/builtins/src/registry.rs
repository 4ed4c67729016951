//! Name-keyed registry of host callables.

use core_types::{Value, VmError, VmResult};
use rustc_hash::FxHashMap;

use crate::host::HostContext;
use crate::{collections, convert, io, math, memory, strings};

/// A builtin: an ordered argument list in, a value out.
pub type BuiltinFn = fn(&mut HostContext, &[Value]) -> VmResult<Value>;

/// Registry mapping builtin names to callables.
///
/// Registration order is irrelevant; registering a name twice overwrites
/// the earlier entry.
#[derive(Default)]
pub struct BuiltinRegistry {
    entries: FxHashMap<String, BuiltinFn>,
}

impl BuiltinRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Create a registry with every mandatory builtin installed.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("print", io::print);
        registry.register("input", io::input);
        registry.register("open", io::open);
        registry.register("read", io::read);
        registry.register("write", io::write);
        registry.register("close", io::close);
        registry.register("throw", io::throw);

        registry.register("int", convert::int);
        registry.register("float", convert::float);
        registry.register("string", convert::string);
        registry.register("bool", convert::bool_);
        registry.register("type", convert::type_);
        registry.register("hash", convert::hash);

        registry.register("abs", math::abs);
        registry.register("pow", math::pow);

        registry.register("substr", strings::substr);

        registry.register("new", memory::new_);
        registry.register("deref", memory::deref);
        registry.register("del", memory::del);

        registry.register("list", collections::list);
        registry.register("append", collections::append);
        registry.register("len", collections::len);

        registry
    }

    /// Install a builtin, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, builtin: BuiltinFn) {
        self.entries.insert(name.into(), builtin);
    }

    /// Whether a builtin of this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Invoke a builtin by name.
    pub fn call(&self, name: &str, host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
        match self.entries.get(name) {
            Some(builtin) => builtin(host, args),
            None => Err(VmError::runtime(format!("Undefined function: {}", name))),
        }
    }

    /// Number of registered builtins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no builtins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for BuiltinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinRegistry")
            .field("entries", &self.entries.len())
            .finish()
    }
}
