//! Per-opcode dispatch.
//!
//! Each instruction either falls through to the next PC or rewrites it.
//! `CALL` jumps onto the `FUNC` instruction so the callee's scope frame
//! opens at run time; `RETURN`, `GOTO`, and the block scans jump past
//! their targets.

use core_types::{ops, PointerValue, Value, VmError, VmResult};
use ir_system::{Instruction, Opcode, Operand};

use crate::flow;
use crate::vm::VirtualMachine;

/// Where execution goes after an instruction.
pub(crate) enum Control {
    /// Fall through to the following instruction.
    Next,
    /// Continue at the given instruction index.
    Jump(usize),
}

impl VirtualMachine {
    pub(crate) fn decode_and_execute(&mut self, instr: &Instruction) -> VmResult<Control> {
        match instr.opcode {
            Opcode::Defvar => {
                let name = self.required_operand(instr, "DEFVAR operation missing variable name")?;
                // Strip a type annotation if present (`name:type`).
                let name = match name.find(':') {
                    Some(pos) => &name[..pos],
                    None => name.as_str(),
                };
                self.state.define(name, Value::Int(0));
                Ok(Control::Next)
            }

            Opcode::Load => {
                let operand = instr
                    .operand(0)
                    .ok_or_else(|| {
                        VmError::access("LOAD operation missing operand").with_line(instr.line)
                    })?
                    .clone();
                let value = self.literal_or_variable(&operand);
                self.state.stack.push(value);
                Ok(Control::Next)
            }

            Opcode::Store => {
                let value = self.pop(instr, "STORE")?;
                let name =
                    self.required_operand(instr, "STORE operation missing variable name")?;
                self.state.store(&name, value);
                Ok(Control::Next)
            }

            Opcode::Push => {
                let operand = instr
                    .operand(0)
                    .ok_or_else(|| {
                        VmError::access("PUSH operation missing operand").with_line(instr.line)
                    })?
                    .clone();
                self.state.stack.push(immediate_value(&operand));
                Ok(Control::Next)
            }

            Opcode::Pop => {
                self.pop(instr, "POP")?;
                Ok(Control::Next)
            }

            Opcode::BinaryOp => {
                if self.state.stack.len() < 2 {
                    return Err(VmError::access("Stack underflow during BINARY_OP operation")
                        .with_line(instr.line));
                }
                let op = self.required_operand(instr, "BINARY_OP operation missing operator")?;
                let right = self.pop(instr, "BINARY_OP")?;
                let left = self.pop(instr, "BINARY_OP")?;
                let result = ops::binary_op(&left, &right, &op, instr.line)?;
                self.state.stack.push(result);
                Ok(Control::Next)
            }

            Opcode::UnaryOp => {
                let op = self.required_operand(instr, "UNARY_OP operation missing operator")?;
                let operand = self.pop(instr, "UNARY_OP")?;
                let result = ops::unary_op(&operand, &op, instr.line)?;
                self.state.stack.push(result);
                Ok(Control::Next)
            }

            Opcode::If => {
                let condition = self.pop(instr, "IF")?;
                if condition.is_truthy() {
                    Ok(Control::Next)
                } else {
                    // Resume after the matching ELSE or END; a missing END
                    // resolves to the end of the program.
                    Ok(match flow::find_else_or_end(&self.state.program, self.state.pc) {
                        Some(target) => Control::Jump(target + 1),
                        None => Control::Jump(self.state.program.len()),
                    })
                }
            }

            Opcode::Else => {
                // Reached by falling out of the true branch: skip over the
                // alternative.
                Ok(match flow::find_end(&self.state.program, self.state.pc) {
                    Some(target) => Control::Jump(target + 1),
                    None => Control::Jump(self.state.program.len()),
                })
            }

            Opcode::End => Ok(self.end_of_block()),

            Opcode::While => {
                let condition = self.pop(instr, "WHILE")?;
                if condition.is_truthy() {
                    // Loop entered: leave this WHILE's PC on the stack so
                    // the matching END can jump back.
                    self.state.stack.push(Value::Int(self.state.pc as i32));
                    Ok(Control::Next)
                } else {
                    Ok(match flow::find_end(&self.state.program, self.state.pc) {
                        Some(target) => Control::Jump(target + 1),
                        None => Control::Jump(self.state.program.len()),
                    })
                }
            }

            Opcode::Do => Ok(Control::Next),

            Opcode::Func => {
                // The function table is built at load time; executing the
                // definition opens the callee's scope frame.
                self.state.scopes.push(Default::default());
                Ok(Control::Next)
            }

            Opcode::Call => {
                let name = self.required_operand(instr, "CALL operation missing function name")?;
                self.call(&name, instr)
            }

            Opcode::Return => Ok(self.return_from_call()),

            Opcode::Goto => {
                let label = self.required_operand(instr, "GOTO operation missing label")?;
                match flow::find_label(&self.state.program, &label) {
                    Some(target) => Ok(Control::Jump(target + 1)),
                    None => Err(VmError::runtime(format!("Undefined label: {}", label))
                        .with_line(instr.line)),
                }
            }

            Opcode::Label => Ok(Control::Next),

            // Recognized but shallow in this version: a TRY frame does not
            // yet capture faults.
            Opcode::Try | Opcode::Catch => Ok(Control::Next),

            Opcode::Throw => {
                let message = match self.state.stack.pop() {
                    Some(Value::Str(s)) => s,
                    Some(_) => "Unknown exception occurred".to_string(),
                    None => "Exception thrown".to_string(),
                };
                Err(VmError::runtime(message).with_line(instr.line))
            }

            Opcode::Break | Opcode::Continue | Opcode::Pass | Opcode::Package => Ok(Control::Next),

            Opcode::Import => {
                if let Some(module) = instr.operand(0) {
                    self.host
                        .console
                        .write_line(&format!("Importing module: {}", module.as_str()));
                }
                Ok(Control::Next)
            }

            Opcode::Print => {
                let value = self.pop(instr, "PRINT")?;
                self.host.console.write_line(&value.to_string());
                Ok(Control::Next)
            }

            Opcode::Input => {
                let line = self.host.read_line().map_err(|e| {
                    VmError::runtime(format!("Failed to read input: {}", e)).with_line(instr.line)
                })?;
                self.state.stack.push(Value::Str(line));
                Ok(Control::Next)
            }

            Opcode::PtrNew => {
                // The size hint is optional.
                let size = match self.state.stack.pop() {
                    Some(hint) => hint.as_i64().max(0) as usize,
                    None => 8,
                };
                let handle = self
                    .host
                    .gc
                    .allocate_with_tag(size, "object")
                    .map_err(|e| e.with_line(instr.line))?;
                self.state
                    .stack
                    .push(Value::Pointer(PointerValue::new(handle, "object")));
                Ok(Control::Next)
            }

            Opcode::PtrDeref => {
                let value = self.pop(instr, "PTR_DEREF")?;
                if let Value::Pointer(p) = &value {
                    if p.is_null {
                        return Err(VmError::runtime("Cannot dereference null pointer")
                            .with_line(instr.line));
                    }
                    let result = self
                        .builtins
                        .call("deref", &mut self.host, &[value])
                        .map_err(|e| e.with_line(instr.line))?;
                    self.state.stack.push(result);
                } else {
                    // Not a pointer: push it back unchanged.
                    self.state.stack.push(value);
                }
                Ok(Control::Next)
            }

            Opcode::GcNew => {
                let size = match self.state.stack.pop() {
                    Some(hint) => hint.as_i64().max(0) as usize,
                    None => 1,
                };
                let handle = self
                    .host
                    .gc
                    .allocate(size)
                    .map_err(|e| e.with_line(instr.line))?;
                self.state.stack.push(Value::Long(handle as i64));
                Ok(Control::Next)
            }

            Opcode::GcDelete => {
                let reference = self.pop(instr, "GC_delete")?;
                self.host.gc.deallocate(reference.as_i64().max(0) as u64);
                Ok(Control::Next)
            }

            Opcode::GcRun => {
                let reclaimed = self.host.gc.collect();
                self.state.stack.push(Value::Int(reclaimed as i32));
                Ok(Control::Next)
            }

            Opcode::MemMalloc => {
                let size = self.pop(instr, "MEM_malloc")?;
                let addr = self
                    .host
                    .raw
                    .malloc(size.as_i64().max(0) as usize)
                    .map_err(|e| e.with_line(instr.line))?;
                self.state.stack.push(Value::Long(addr));
                Ok(Control::Next)
            }

            Opcode::MemFree => {
                let addr = self.pop(instr, "MEM_free")?;
                self.host.raw.free(addr.as_i64());
                Ok(Control::Next)
            }

            Opcode::Nop => Ok(Control::Next),
        }
    }

    /// `END`: a loop end jumps back to its body, anything else falls
    /// through.
    ///
    /// A loop end is recognized by an integer sentinel directly beneath
    /// the freshly recomputed condition, pointing at a `WHILE`
    /// instruction. The condition is consumed; the sentinel survives
    /// until the loop exits.
    fn end_of_block(&mut self) -> Control {
        let depth = self.state.stack.len();
        if depth < 2 {
            return Control::Next;
        }

        let target = match self.state.stack[depth - 2] {
            Value::Int(sentinel) if sentinel >= 0 => sentinel as usize,
            _ => return Control::Next,
        };
        let is_loop_head = self
            .state
            .program
            .get(target)
            .map(|i| i.opcode == Opcode::While)
            .unwrap_or(false);
        if !is_loop_head {
            return Control::Next;
        }

        let condition = match self.state.stack.pop() {
            Some(v) => v,
            None => return Control::Next,
        };
        if condition.is_truthy() {
            Control::Jump(target + 1)
        } else {
            self.state.stack.pop();
            Control::Next
        }
    }

    /// `CALL`: builtins consume at most one stack argument; user
    /// functions get the return address pushed as an integer sentinel.
    fn call(&mut self, name: &str, instr: &Instruction) -> VmResult<Control> {
        if self.builtins.contains(name) {
            let mut args = Vec::with_capacity(1);
            if let Some(arg) = self.state.stack.pop() {
                args.push(arg);
            }
            let result = self
                .builtins
                .call(name, &mut self.host, &args)
                .map_err(|e| match e.line {
                    Some(_) => e,
                    None => e.with_line(instr.line),
                })?;
            self.state.stack.push(result);
            return Ok(Control::Next);
        }

        match self.state.functions.get(name) {
            Some(&func_pc) => {
                self.state.stack.push(Value::Int(self.state.pc as i32));
                Ok(Control::Jump(func_pc))
            }
            None => Err(VmError::runtime(format!("Undefined function: {}", name))
                .with_line(instr.line)),
        }
    }

    /// `RETURN`: pop the sentinel, restore the PC, and drop the scope
    /// frame. Without a sentinel, execution stops.
    fn return_from_call(&mut self) -> Control {
        match self.state.stack.last() {
            Some(Value::Int(addr)) if *addr >= 0 => {
                let target = *addr as usize;
                self.state.stack.pop();
                if self.state.scopes.len() > 1 {
                    self.state.scopes.pop();
                }
                Control::Jump(target + 1)
            }
            _ => {
                self.state.running = false;
                Control::Next
            }
        }
    }

    /// Resolve a LOAD operand: quoted operands are string literals, bare
    /// operands try the keyword and numeric forms before falling back to
    /// a variable lookup. Undefined names yield integer zero.
    pub(crate) fn literal_or_variable(&self, operand: &Operand) -> Value {
        if operand.quoted {
            return Value::Str(operand.text.clone());
        }
        if let Some(value) = parse_literal(&operand.text) {
            return value;
        }
        self.state.lookup(&operand.text)
    }

    /// Resolve breakpoint-condition terms the same way LOAD does.
    pub(crate) fn resolve_term(&self, text: &str) -> Value {
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            return Value::Str(text[1..text.len() - 1].to_string());
        }
        match parse_literal(text) {
            Some(value) => value,
            None => self.state.lookup(text),
        }
    }

    fn required_operand(&self, instr: &Instruction, message: &str) -> VmResult<String> {
        instr
            .operand(0)
            .map(|op| op.as_str().to_string())
            .ok_or_else(|| VmError::access(message).with_line(instr.line))
    }

    fn pop(&mut self, instr: &Instruction, opcode: &str) -> VmResult<Value> {
        self.state.stack.pop().ok_or_else(|| {
            VmError::access(format!("Stack underflow during {} operation", opcode))
                .with_line(instr.line)
        })
    }
}

fn parse_literal(text: &str) -> Option<Value> {
    match text {
        "true" => return Some(Value::Boolean(true)),
        "false" => return Some(Value::Boolean(false)),
        "null" => return Some(Value::Null),
        _ => {}
    }
    if text.contains('.') {
        if let Ok(n) = text.parse::<f64>() {
            return Some(Value::Double(n));
        }
        return None;
    }
    if let Ok(n) = text.parse::<i32>() {
        return Some(Value::Int(n));
    }
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Long(n));
    }
    None
}

/// Resolve a PUSH operand: numbers parse, everything else is a string.
fn immediate_value(operand: &Operand) -> Value {
    if operand.quoted {
        return Value::Str(operand.text.clone());
    }
    if operand.text.contains('.') {
        if let Ok(n) = operand.text.parse::<f64>() {
            return Value::Double(n);
        }
    } else if let Ok(n) = operand.text.parse::<i32>() {
        return Value::Int(n);
    } else if let Ok(n) = operand.text.parse::<i64>() {
        return Value::Long(n);
    }
    Value::Str(operand.text.clone())
}
