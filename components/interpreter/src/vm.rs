//! Virtual machine facade.
//!
//! Owns the machine state, the host context, the builtin registry, the
//! JIT fast path, and the debugger state. The outer execution loop lives
//! here; per-opcode dispatch is in `dispatch`.

use std::path::Path;

use builtins::{BuiltinRegistry, HostContext};
use core_types::{Value, VmError, VmResult};
use ir_system::Opcode;
use jit_compiler::BaselineJit;

use crate::debug::DebugState;
use crate::dispatch::Control;
use crate::machine::MachineState;

/// The steve virtual machine.
///
/// # Examples
///
/// ```
/// use builtins::HostContext;
/// use interpreter::VirtualMachine;
///
/// let (host, output) = HostContext::with_io("");
/// let mut vm = VirtualMachine::with_host(host);
/// vm.load_source("LOAD \"hi\"\nPRINT\n").unwrap();
/// vm.execute().unwrap();
/// assert_eq!(output.borrow().as_slice(), ["hi"]);
/// ```
pub struct VirtualMachine {
    pub(crate) state: MachineState,
    pub(crate) host: HostContext,
    pub(crate) builtins: BuiltinRegistry,
    pub(crate) debug: DebugState,
    jit: BaselineJit,
    use_jit: bool,
}

impl VirtualMachine {
    /// Create a machine wired to real stdin/stdout.
    pub fn new() -> Self {
        Self::with_host(HostContext::new())
    }

    /// Create a machine over an explicit host context.
    pub fn with_host(host: HostContext) -> Self {
        Self {
            state: MachineState::new(),
            host,
            builtins: BuiltinRegistry::with_defaults(),
            debug: DebugState::new(),
            jit: BaselineJit::new(),
            use_jit: false,
        }
    }

    /// Enable or disable the JIT fast path. Disabled by default.
    pub fn set_use_jit(&mut self, enabled: bool) {
        self.use_jit = enabled;
    }

    /// Load a program from an IR file.
    pub fn load_program(&mut self, path: &Path) -> VmResult<()> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            VmError::runtime(format!("Cannot open file: {}: {}", path.display(), e))
        })?;
        self.load_source(&source)
    }

    /// Load a program from IR text.
    ///
    /// Decodes the text and builds the function table: every `FUNC`
    /// records its name and PC at load time, so forward calls resolve.
    pub fn load_source(&mut self, source: &str) -> VmResult<()> {
        let program = ir_system::decode(source);
        if program.is_empty() {
            return Err(VmError::runtime("No instructions decoded from program"));
        }

        self.state.functions.clear();
        for (index, instr) in program.iter().enumerate() {
            if instr.opcode == Opcode::Func {
                if let Some(name) = instr.operand(0) {
                    self.state
                        .functions
                        .insert(name.as_str().to_string(), index);
                }
            }
        }

        self.state.program = program;
        Ok(())
    }

    /// Execute the loaded program.
    ///
    /// When the JIT is enabled and the program is eligible, the compiled
    /// fast path runs instead and its 64-bit result is reported on
    /// stderr; any compilation or execution failure falls back to the
    /// interpreter. Faults unwind out of dispatch, are reported with the
    /// PC and source line, and surface as the returned error.
    pub fn execute(&mut self) -> VmResult<()> {
        if self.state.program.is_empty() {
            let err = VmError::runtime("No program loaded");
            eprintln!("{}", err);
            return Err(err);
        }

        if self.use_jit && jit_compiler::is_eligible(&self.state.program) {
            match self.jit.compile(&self.state.program) {
                Ok(compiled) => match compiled.execute() {
                    Ok(result) => {
                        eprintln!("[jit] execution result: {}", result);
                        return Ok(());
                    }
                    Err(e) => {
                        eprintln!("[jit] {}, falling back to interpreter", e);
                    }
                },
                Err(e) => {
                    eprintln!("[jit] {}, falling back to interpreter", e);
                }
            }
        }

        self.state.pc = 0;
        self.state.running = true;
        let result = self.run();
        self.state.running = false;

        if let Err(e) = &result {
            eprintln!("Execution error at pc {}: {}", self.state.pc, e);
        }
        result
    }

    fn run(&mut self) -> VmResult<()> {
        while self.state.running && self.state.pc < self.state.program.len() {
            self.advance()?;
        }
        Ok(())
    }

    /// Execute the instruction at the current PC and move to the next.
    pub(crate) fn advance(&mut self) -> VmResult<()> {
        let instr = self.state.program[self.state.pc].clone();
        match self.decode_and_execute(&instr)? {
            Control::Next => self.state.pc += 1,
            Control::Jump(target) => self.state.pc = target,
        }
        Ok(())
    }

    /// Reset the machine to its initial state.
    ///
    /// Clears the stack, scopes, variables, functions, and program; host
    /// resources (heap, files) are left alone.
    pub fn reset(&mut self) {
        self.state = MachineState::new();
    }

    /// The current machine state.
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// The host context.
    pub fn host(&self) -> &HostContext {
        &self.host
    }

    /// Mutable access to the host context.
    pub fn host_mut(&mut self) -> &mut HostContext {
        &mut self.host
    }

    /// The builtin registry.
    pub fn builtins_mut(&mut self) -> &mut BuiltinRegistry {
        &mut self.builtins
    }

    /// The debugger state.
    pub fn debug_state(&self) -> &DebugState {
        &self.debug
    }

    /// Render the operand stack for diagnostics.
    pub fn stack_summary(&self) -> String {
        let rendered: Vec<String> = self
            .state
            .stack
            .iter()
            .map(|v| match v {
                Value::Str(s) => format!("\"{}\"", s),
                other => other.to_string(),
            })
            .collect();
        format!(
            "Stack ({} elements): {}",
            self.state.stack.len(),
            rendered.join(" ")
        )
    }
}

impl Default for VirtualMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for VirtualMachine {
    fn drop(&mut self) {
        // Runtime teardown: close remaining handles, then run a final
        // collection.
        self.host.files.close_all();
        self.host.gc.collect();
    }
}

impl std::fmt::Debug for VirtualMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualMachine")
            .field("pc", &self.state.pc)
            .field("running", &self.state.running)
            .field("stack_depth", &self.state.stack.len())
            .field("program_len", &self.state.program.len())
            .field("use_jit", &self.use_jit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm_with_output() -> (VirtualMachine, std::rc::Rc<std::cell::RefCell<Vec<String>>>) {
        let (host, output) = HostContext::with_io("");
        (VirtualMachine::with_host(host), output)
    }

    #[test]
    fn test_load_source_rejects_empty() {
        let (mut vm, _) = vm_with_output();
        assert!(vm.load_source("; only a comment\n").is_err());
    }

    #[test]
    fn test_load_source_indexes_functions() {
        let (mut vm, _) = vm_with_output();
        vm.load_source("GOTO main\nFUNC helper\nRETURN\nLABEL main\nPASS\n")
            .unwrap();
        assert_eq!(vm.state().functions.get("helper"), Some(&1));
    }

    #[test]
    fn test_execute_without_program_fails() {
        let (mut vm, _) = vm_with_output();
        assert!(vm.execute().is_err());
    }

    #[test]
    fn test_stack_summary_quotes_strings() {
        let (mut vm, _) = vm_with_output();
        vm.state.stack.push(Value::Int(1));
        vm.state.stack.push(Value::Str("a".into()));
        assert_eq!(vm.stack_summary(), "Stack (2 elements): 1 \"a\"");
    }

    #[test]
    fn test_reset_clears_machine_state() {
        let (mut vm, _) = vm_with_output();
        vm.load_source("LOAD 1\nSTORE x\n").unwrap();
        vm.execute().unwrap();
        assert!(!vm.state().globals.is_empty());

        vm.reset();
        assert!(vm.state().program.is_empty());
        assert!(vm.state().globals.is_empty());
        assert_eq!(vm.state().scopes.len(), 1);
    }

    #[test]
    fn test_jit_path_keeps_stdout_clean() {
        let (host, output) = HostContext::with_io("");
        let mut vm = VirtualMachine::with_host(host);
        vm.set_use_jit(true);
        vm.load_source("LOAD 2\nLOAD 3\nBINARY_OP +\n").unwrap();
        vm.execute().unwrap();
        // The fast-path result is host diagnostics, not program output.
        assert!(output.borrow().is_empty());
    }

    #[test]
    fn test_jit_falls_back_for_effectful_programs() {
        let (host, output) = HostContext::with_io("");
        let mut vm = VirtualMachine::with_host(host);
        vm.set_use_jit(true);
        vm.load_source("LOAD 2\nLOAD 3\nBINARY_OP +\nPRINT\n").unwrap();
        vm.execute().unwrap();
        assert_eq!(output.borrow().as_slice(), ["5"]);
    }
}
