//! Machine state.

use core_types::Value;
use ir_system::Instruction;
use rustc_hash::FxHashMap;

/// The interpreter's execution state.
///
/// The scope stack is never empty: the bottom frame is the program's base
/// scope, distinct from the global variable map that `STORE` falls back
/// to when no enclosing scope binds a name.
#[derive(Debug, Default)]
pub struct MachineState {
    /// Program counter: index into the instruction vector.
    pub pc: usize,
    /// Whether execution should continue.
    pub running: bool,
    /// Operand stack.
    pub stack: Vec<Value>,
    /// Scope chain, innermost frame last.
    pub scopes: Vec<FxHashMap<String, Value>>,
    /// Global variable map.
    pub globals: FxHashMap<String, Value>,
    /// Function table: name to the PC of its FUNC instruction.
    pub functions: FxHashMap<String, usize>,
    /// The loaded program.
    pub program: Vec<Instruction>,
}

impl MachineState {
    /// Create a fresh machine with one (base) scope frame.
    pub fn new() -> Self {
        Self {
            pc: 0,
            running: false,
            stack: Vec::with_capacity(64),
            scopes: vec![FxHashMap::default()],
            globals: FxHashMap::default(),
            functions: FxHashMap::default(),
            program: Vec::new(),
        }
    }

    /// Look a variable up through the scope chain, innermost first, then
    /// the global map. An unbound name yields integer zero.
    pub fn lookup(&self, name: &str) -> Value {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(name) {
                return value.clone();
            }
        }
        self.globals.get(name).cloned().unwrap_or(Value::Int(0))
    }

    /// Store into the nearest binding of `name`, falling back to the
    /// global map when no enclosing scope binds it.
    pub fn store(&mut self, name: &str, value: Value) {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return;
            }
        }
        self.globals.insert(name.to_string(), value);
    }

    /// Install `name` in the innermost scope frame.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(top) = self.scopes.last_mut() {
            top.insert(name.to_string(), value);
        }
    }
}
