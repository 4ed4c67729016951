//! Runtime orchestration for IR execution.
//!
//! The `Runtime` struct wires the CLI to the virtual machine: it loads
//! IR files, optionally prints the decoded listing, installs
//! breakpoints, and runs either the plain or the debugger-wrapped
//! execution loop.

use crate::error::{CliError, CliResult};
use interpreter::{DebugInterface, VirtualMachine};

/// Orchestrates loading and executing an IR program.
pub struct Runtime {
    vm: VirtualMachine,
    print_ir: bool,
}

impl Runtime {
    /// Create a runtime.
    ///
    /// # Arguments
    /// * `enable_jit` - Whether the JIT fast path may be consulted.
    pub fn new(enable_jit: bool) -> Self {
        let mut vm = VirtualMachine::new();
        vm.set_use_jit(enable_jit);
        Self {
            vm,
            print_ir: false,
        }
    }

    /// Enable printing of the decoded instruction listing.
    pub fn with_print_ir(mut self, enabled: bool) -> Self {
        self.print_ir = enabled;
        self
    }

    /// Load and execute an IR file.
    pub fn execute_file(&mut self, path: &str) -> CliResult<()> {
        let source = std::fs::read_to_string(path)?;
        self.execute_source(&source)
    }

    /// Load and execute IR text.
    pub fn execute_source(&mut self, source: &str) -> CliResult<()> {
        self.load(source)?;
        self.vm.execute().map_err(CliError::Vm)
    }

    /// Load and execute an IR file under the debugger.
    pub fn debug_file(&mut self, path: &str, ui: &mut dyn DebugInterface) -> CliResult<()> {
        let source = std::fs::read_to_string(path)?;
        self.load(&source)?;
        // Without breakpoints, pause at the first instruction so the
        // session starts suspended.
        if self.vm.debug_state().breakpoints.is_empty() {
            self.vm.step();
        }
        self.vm.execute_debug(ui).map_err(CliError::Vm)
    }

    fn load(&mut self, source: &str) -> CliResult<()> {
        self.vm
            .load_source(source)
            .map_err(|e| CliError::Load(e.message))?;
        if self.print_ir {
            for (index, instr) in self.vm.state().program.iter().enumerate() {
                println!("{:4}  {}", index, instr.emit());
            }
        }
        Ok(())
    }

    /// Install a breakpoint on a source line.
    pub fn add_breakpoint(&mut self, line: u32) {
        self.vm.add_breakpoint(line, usize::MAX);
    }

    /// Direct access to the virtual machine.
    pub fn vm(&mut self) -> &mut VirtualMachine {
        &mut self.vm
    }
}
