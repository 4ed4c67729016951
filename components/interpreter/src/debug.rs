//! Debugger harness.
//!
//! A separate entry point wraps per-instruction execution with
//! pre-dispatch checks: breakpoints (by PC or source line, optionally
//! conditional), stepping commands, and call-depth tracking over a shadow
//! call stack. Pausing renders a textual status and pulls the next
//! command from a [`DebugInterface`].

use core_types::{ops, VmError, VmResult};
use ir_system::{Instruction, Opcode};

use crate::vm::VirtualMachine;

/// A debugger command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    /// No pending command.
    None,
    /// Pause at every instruction.
    Step,
    /// Pause after returning to the current call depth.
    StepOver,
    /// Pause on the next call entry.
    StepInto,
    /// Pause after returning one level up.
    StepOut,
    /// Clear stepping and run to the next breakpoint.
    Continue,
    /// Stop execution.
    Break,
}

/// A breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    /// Source line to match (1-based).
    pub line: u32,
    /// Program counter to match.
    pub pc: usize,
    /// Whether the breakpoint is active.
    pub enabled: bool,
    /// Optional condition; the breakpoint fires when it evaluates truthy.
    pub condition: Option<String>,
    /// One-shot breakpoints remove themselves after firing.
    pub temporary: bool,
}

impl Breakpoint {
    /// Create an unconditional breakpoint.
    pub fn new(line: u32, pc: usize) -> Self {
        Self {
            line,
            pc,
            enabled: true,
            condition: None,
            temporary: false,
        }
    }

    /// Create a conditional breakpoint.
    pub fn with_condition(line: u32, pc: usize, condition: impl Into<String>) -> Self {
        Self {
            line,
            pc,
            enabled: true,
            condition: Some(condition.into()),
            temporary: false,
        }
    }
}

/// Debugger state.
#[derive(Debug)]
pub struct DebugState {
    /// Whether the debugger is active.
    pub enabled: bool,
    /// Pending command.
    pub pending: DebugCommand,
    /// Active breakpoints.
    pub breakpoints: Vec<Breakpoint>,
    /// Shadow call stack: PC of each active call site.
    pub call_stack: Vec<usize>,
    /// Current call depth.
    pub call_depth: usize,
    /// Call depth the pending step command is anchored at.
    pub step_anchor: usize,
}

impl DebugState {
    /// Create an inactive debug state.
    pub fn new() -> Self {
        Self {
            enabled: false,
            pending: DebugCommand::None,
            breakpoints: Vec::new(),
            call_stack: Vec::new(),
            call_depth: 0,
            step_anchor: 0,
        }
    }
}

impl Default for DebugState {
    fn default() -> Self {
        Self::new()
    }
}

/// Supplies the next command whenever execution pauses.
pub trait DebugInterface {
    /// Called with a rendered status (PC, source line, stack summary);
    /// returns the command to resume with.
    fn on_pause(&mut self, status: &str) -> DebugCommand;
}

/// A [`DebugInterface`] that replays a fixed command list.
///
/// Useful in tests: records every pause status and answers with the next
/// scripted command, falling back to `Continue` when the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedDebugger {
    commands: std::collections::VecDeque<DebugCommand>,
    pauses: Vec<String>,
}

impl ScriptedDebugger {
    /// Create a scripted debugger from a command list.
    pub fn new(commands: Vec<DebugCommand>) -> Self {
        Self {
            commands: commands.into(),
            pauses: Vec::new(),
        }
    }

    /// The status lines rendered at each pause.
    pub fn pauses(&self) -> &[String] {
        &self.pauses
    }
}

impl DebugInterface for ScriptedDebugger {
    fn on_pause(&mut self, status: &str) -> DebugCommand {
        self.pauses.push(status.to_string());
        self.commands.pop_front().unwrap_or(DebugCommand::Continue)
    }
}

impl VirtualMachine {
    /// Execute the loaded program under the debugger.
    ///
    /// With no breakpoints and no pending step command this behaves like
    /// [`VirtualMachine::execute`] without the JIT consult.
    pub fn execute_debug(&mut self, ui: &mut dyn DebugInterface) -> VmResult<()> {
        if self.state.program.is_empty() {
            let err = VmError::runtime("No program loaded");
            eprintln!("{}", err);
            return Err(err);
        }

        self.debug.enabled = true;
        self.state.pc = 0;
        self.state.running = true;
        let result = self.run_debug(ui);
        self.state.running = false;
        self.debug.enabled = false;

        if let Err(e) = &result {
            eprintln!("Execution error at pc {}: {}", self.state.pc, e);
        }
        result
    }

    fn run_debug(&mut self, ui: &mut dyn DebugInterface) -> VmResult<()> {
        while self.state.running && self.state.pc < self.state.program.len() {
            let pc = self.state.pc;
            let instr = self.state.program[pc].clone();

            if self.should_pause_at(pc, instr.line) {
                self.drop_fired_temporaries(pc, instr.line);
                let status = self.render_pause(pc, &instr);
                let command = ui.on_pause(&status);
                self.apply_debug_command(command);
                if !self.state.running {
                    break;
                }
            }

            self.track_call_depth(&instr, pc);
            self.advance()?;
        }
        Ok(())
    }

    /// Whether execution should pause before the instruction at `pc`.
    fn should_pause_at(&self, pc: usize, line: u32) -> bool {
        for bp in &self.debug.breakpoints {
            if bp.enabled && (bp.pc == pc || bp.line == line) {
                match &bp.condition {
                    None => return true,
                    Some(cond) => {
                        if self.eval_condition(cond) {
                            return true;
                        }
                    }
                }
            }
        }

        match self.debug.pending {
            DebugCommand::Step => true,
            DebugCommand::StepOver => self.debug.call_depth <= self.debug.step_anchor,
            DebugCommand::StepInto => self.debug.call_depth > self.debug.step_anchor,
            DebugCommand::StepOut => self.debug.call_depth < self.debug.step_anchor,
            _ => false,
        }
    }

    /// Evaluate a breakpoint condition against the live scopes.
    ///
    /// Supports a bare term (literal or variable, judged by truthiness)
    /// or `lhs OP rhs` for the comparison operators.
    fn eval_condition(&self, condition: &str) -> bool {
        let condition = condition.trim();
        if condition.is_empty() {
            return true;
        }

        for op in ["==", "!=", "<=", ">=", "<", ">"] {
            if let Some(pos) = condition.find(op) {
                let left = self.resolve_term(condition[..pos].trim());
                let right = self.resolve_term(condition[pos + op.len()..].trim());
                return ops::binary_op(&left, &right, op, 0)
                    .map(|v| v.is_truthy())
                    .unwrap_or(false);
            }
        }

        self.resolve_term(condition).is_truthy()
    }

    fn drop_fired_temporaries(&mut self, pc: usize, line: u32) {
        self.debug
            .breakpoints
            .retain(|bp| !(bp.temporary && bp.enabled && (bp.pc == pc || bp.line == line)));
    }

    fn render_pause(&self, pc: usize, instr: &Instruction) -> String {
        format!(
            "paused at pc {} (line {}): {}\n{}",
            pc,
            instr.line,
            instr.emit(),
            self.stack_summary()
        )
    }

    fn apply_debug_command(&mut self, command: DebugCommand) {
        match command {
            DebugCommand::Step => self.debug.pending = DebugCommand::Step,
            DebugCommand::StepOver | DebugCommand::StepInto | DebugCommand::StepOut => {
                self.debug.pending = command;
                self.debug.step_anchor = self.debug.call_depth;
            }
            DebugCommand::Continue | DebugCommand::None => {
                self.debug.pending = DebugCommand::None;
            }
            DebugCommand::Break => {
                self.debug.pending = DebugCommand::None;
                self.state.running = false;
            }
        }
    }

    /// Track call depth over the shadow call stack.
    ///
    /// Only calls that actually transfer control count: a builtin CALL
    /// completes within its own instruction and leaves the depth alone.
    fn track_call_depth(&mut self, instr: &Instruction, pc: usize) {
        match instr.opcode {
            Opcode::Call => {
                let is_user_call = instr
                    .operand(0)
                    .map(|name| {
                        !self.builtins.contains(name.as_str())
                            && self.state.functions.contains_key(name.as_str())
                    })
                    .unwrap_or(false);
                if is_user_call {
                    self.debug.call_stack.push(pc);
                    self.debug.call_depth += 1;
                }
            }
            Opcode::Return => {
                self.debug.call_stack.pop();
                self.debug.call_depth = self.debug.call_depth.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Request a pause at the next instruction.
    pub fn step(&mut self) {
        self.debug.pending = DebugCommand::Step;
    }

    /// Request a pause after returning to the current call depth.
    pub fn step_over(&mut self) {
        self.debug.pending = DebugCommand::StepOver;
        self.debug.step_anchor = self.debug.call_depth;
    }

    /// Request a pause on the next call entry.
    pub fn step_into(&mut self) {
        self.debug.pending = DebugCommand::StepInto;
        self.debug.step_anchor = self.debug.call_depth;
    }

    /// Request a pause after returning one level up.
    pub fn step_out(&mut self) {
        self.debug.pending = DebugCommand::StepOut;
        self.debug.step_anchor = self.debug.call_depth;
    }

    /// Clear stepping; run until the next breakpoint.
    pub fn continue_execution(&mut self) {
        self.debug.pending = DebugCommand::None;
    }

    /// Add an unconditional breakpoint.
    pub fn add_breakpoint(&mut self, line: u32, pc: usize) {
        self.debug.breakpoints.push(Breakpoint::new(line, pc));
    }

    /// Add a conditional breakpoint.
    pub fn add_conditional_breakpoint(
        &mut self,
        line: u32,
        pc: usize,
        condition: impl Into<String>,
    ) {
        self.debug
            .breakpoints
            .push(Breakpoint::with_condition(line, pc, condition));
    }

    /// Remove the non-temporary breakpoints on a source line.
    pub fn remove_breakpoint(&mut self, line: u32) {
        self.debug
            .breakpoints
            .retain(|bp| bp.line != line || bp.temporary);
    }

    /// Remove the non-temporary breakpoints at a PC.
    pub fn remove_breakpoint_by_pc(&mut self, pc: usize) {
        self.debug
            .breakpoints
            .retain(|bp| bp.pc != pc || bp.temporary);
    }

    /// Enable the breakpoints on a source line.
    pub fn enable_breakpoint(&mut self, line: u32) {
        for bp in &mut self.debug.breakpoints {
            if bp.line == line {
                bp.enabled = true;
            }
        }
    }

    /// Disable the breakpoints on a source line.
    pub fn disable_breakpoint(&mut self, line: u32) {
        for bp in &mut self.debug.breakpoints {
            if bp.line == line {
                bp.enabled = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use builtins::HostContext;

    fn vm(source: &str) -> VirtualMachine {
        let (host, _) = HostContext::with_io("");
        let mut vm = VirtualMachine::with_host(host);
        vm.load_source(source).unwrap();
        vm
    }

    #[test]
    fn test_step_pauses_at_every_instruction() {
        let mut vm = vm("LOAD 1\nLOAD 2\nBINARY_OP +\nPOP\n");
        vm.step();

        let mut ui = ScriptedDebugger::new(vec![
            DebugCommand::Step,
            DebugCommand::Step,
            DebugCommand::Step,
            DebugCommand::Step,
        ]);
        vm.execute_debug(&mut ui).unwrap();
        assert_eq!(ui.pauses().len(), 4);
        assert!(ui.pauses()[0].starts_with("paused at pc 0 (line 1): LOAD 1"));
        assert!(ui.pauses()[2].contains("BINARY_OP +"));
    }

    #[test]
    fn test_breakpoint_by_pc() {
        let mut vm = vm("LOAD 1\nLOAD 2\nBINARY_OP +\nPOP\n");
        vm.add_breakpoint(0, 2);

        let mut ui = ScriptedDebugger::new(vec![DebugCommand::Continue]);
        vm.execute_debug(&mut ui).unwrap();
        assert_eq!(ui.pauses().len(), 1);
        assert!(ui.pauses()[0].contains("pc 2"));
        // The stack summary shows both operands at the pause point.
        assert!(ui.pauses()[0].contains("Stack (2 elements): 1 2"));
    }

    #[test]
    fn test_breakpoint_by_line() {
        let mut vm = vm("LOAD 1\nLOAD 2\nPOP\nPOP\n");
        vm.add_breakpoint(2, usize::MAX);

        let mut ui = ScriptedDebugger::new(vec![DebugCommand::Continue]);
        vm.execute_debug(&mut ui).unwrap();
        assert_eq!(ui.pauses().len(), 1);
        assert!(ui.pauses()[0].contains("line 2"));
    }

    #[test]
    fn test_disabled_breakpoint_does_not_fire() {
        let mut vm = vm("LOAD 1\nPOP\n");
        vm.add_breakpoint(1, 0);
        vm.disable_breakpoint(1);

        let mut ui = ScriptedDebugger::new(vec![]);
        vm.execute_debug(&mut ui).unwrap();
        assert!(ui.pauses().is_empty());

        vm.enable_breakpoint(1);
        let mut ui = ScriptedDebugger::new(vec![DebugCommand::Continue]);
        vm.execute_debug(&mut ui).unwrap();
        assert_eq!(ui.pauses().len(), 1);
    }

    #[test]
    fn test_conditional_breakpoint() {
        // Loop i from 0 to 4, breakpoint at the PRINT with condition i==3.
        let source = "\
DEFVAR i
LOAD 0
STORE i
LOAD i
LOAD 5
BINARY_OP <
WHILE
DO
LOAD i
PRINT
LOAD i
LOAD 1
BINARY_OP +
STORE i
LOAD i
LOAD 5
BINARY_OP <
END
";
        let (host, _) = HostContext::with_io("");
        let mut vm = VirtualMachine::with_host(host);
        vm.load_source(source).unwrap();
        // PRINT is at pc 9.
        vm.add_conditional_breakpoint(u32::MAX, 9, "i == 3");

        let mut ui = ScriptedDebugger::new(vec![DebugCommand::Continue]);
        vm.execute_debug(&mut ui).unwrap();
        assert_eq!(ui.pauses().len(), 1);
        assert!(ui.pauses()[0].contains("PRINT"));
    }

    #[test]
    fn test_temporary_breakpoint_fires_once() {
        let source = "\
DEFVAR i
LOAD 0
STORE i
LOAD i
LOAD 3
BINARY_OP <
WHILE
DO
LOAD i
LOAD 1
BINARY_OP +
STORE i
LOAD i
LOAD 3
BINARY_OP <
END
";
        let mut vm = vm(source);
        vm.debug.breakpoints.push(Breakpoint {
            line: u32::MAX,
            pc: 7,
            enabled: true,
            condition: None,
            temporary: true,
        });

        let mut ui = ScriptedDebugger::new(vec![DebugCommand::Continue]);
        vm.execute_debug(&mut ui).unwrap();
        // The DO at pc 7 runs three times but only the first pauses.
        assert_eq!(ui.pauses().len(), 1);
        assert!(vm.debug_state().breakpoints.is_empty());
    }

    #[test]
    fn test_break_command_stops_execution() {
        let mut vm = vm("LOAD 1\nLOAD 2\nSTORE x\nSTORE y\n");
        vm.step();

        let mut ui = ScriptedDebugger::new(vec![DebugCommand::Step, DebugCommand::Break]);
        vm.execute_debug(&mut ui).unwrap();
        assert_eq!(ui.pauses().len(), 2);
        // Execution stopped before the stores ran.
        assert!(vm.state().globals.is_empty());
    }

    #[test]
    fn test_call_depth_tracking() {
        let source = "\
GOTO main
FUNC helper
LOAD 1
STORE inside
RETURN
LABEL main
CALL helper
PASS
";
        let mut vm = vm(source);
        vm.step();

        let mut commands = vec![DebugCommand::Step; 10];
        commands.push(DebugCommand::Continue);
        let mut ui = ScriptedDebugger::new(commands);
        vm.execute_debug(&mut ui).unwrap();

        // Depth is balanced after the call returns.
        assert_eq!(vm.debug_state().call_depth, 0);
        assert!(vm.debug_state().call_stack.is_empty());
        assert_eq!(vm.state().globals.get("inside"), Some(&core_types::Value::Int(1)));
    }

    #[test]
    fn test_step_over_skips_callee() {
        let source = "\
GOTO main
FUNC helper
LOAD 1
STORE inside
RETURN
LABEL main
CALL helper
PASS
";
        let mut vm = vm(source);
        // Break at the CALL (pc 6), then step over it.
        vm.add_breakpoint(u32::MAX, 6);

        let mut ui = ScriptedDebugger::new(vec![DebugCommand::StepOver, DebugCommand::Continue]);
        vm.execute_debug(&mut ui).unwrap();

        assert_eq!(ui.pauses().len(), 2);
        assert!(ui.pauses()[0].contains("CALL helper"));
        // The second pause is after the callee returned, not inside it.
        assert!(ui.pauses()[1].contains("PASS"));
    }

    #[test]
    fn test_step_into_pauses_inside_callee() {
        let source = "\
GOTO main
FUNC helper
LOAD 1
STORE inside
RETURN
LABEL main
CALL helper
PASS
";
        let mut vm = vm(source);
        vm.add_breakpoint(u32::MAX, 6);

        let mut ui = ScriptedDebugger::new(vec![DebugCommand::StepInto, DebugCommand::Continue]);
        vm.execute_debug(&mut ui).unwrap();

        assert_eq!(ui.pauses().len(), 2);
        // CALL jumps onto the FUNC instruction, the first callee pause.
        assert!(ui.pauses()[1].contains("FUNC helper"));
    }

    #[test]
    fn test_remove_breakpoints() {
        let mut vm = vm("PASS\n");
        vm.add_breakpoint(3, 7);
        vm.add_breakpoint(4, 8);
        assert_eq!(vm.debug_state().breakpoints.len(), 2);

        vm.remove_breakpoint(3);
        assert_eq!(vm.debug_state().breakpoints.len(), 1);
        vm.remove_breakpoint_by_pc(8);
        assert!(vm.debug_state().breakpoints.is_empty());
    }
}
