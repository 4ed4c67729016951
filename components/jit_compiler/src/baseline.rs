//! Baseline compiler for straight-line arithmetic programs.

use ir_system::{Instruction, Opcode};

use crate::compiled::{CompiledProgram, JitError, LoweredOp};

/// Whether a program may be considered for the fast path at all.
///
/// The fast path executes a program wholesale, so anything with control
/// flow is out: `FUNC`, `IF`, `WHILE`, `CALL`, and `GOTO` disqualify the
/// program. The empty program is not eligible either.
pub fn is_eligible(program: &[Instruction]) -> bool {
    !program.is_empty() && !program.iter().any(|i| i.opcode.blocks_jit())
}

/// Template compiler lowering eligible programs to stack-op artifacts.
///
/// Compilation is deliberately conservative: only pure integer arithmetic
/// is accepted. Any instruction with observable effects (printing, input,
/// heap or file traffic) or an operand the compiler cannot type as an
/// integer literal fails compilation, which makes the runtime fall back
/// to the interpreter.
#[derive(Debug, Default)]
pub struct BaselineJit {
    programs_compiled: u64,
}

impl BaselineJit {
    /// Create a baseline compiler.
    pub fn new() -> Self {
        Self {
            programs_compiled: 0,
        }
    }

    /// Compile an instruction vector into an invocable artifact.
    pub fn compile(&mut self, program: &[Instruction]) -> Result<CompiledProgram, JitError> {
        if !is_eligible(program) {
            return Err(JitError::Unsupported("program is not eligible".into()));
        }

        let mut ops = Vec::with_capacity(program.len());
        for instr in program {
            match instr.opcode {
                Opcode::Nop | Opcode::Pass | Opcode::Label | Opcode::Package => {}
                Opcode::Load | Opcode::Push => {
                    ops.push(LoweredOp::Push(integer_literal(instr)?));
                }
                Opcode::Pop => ops.push(LoweredOp::Drop),
                Opcode::BinaryOp => ops.push(binary_operator(instr)?),
                Opcode::UnaryOp => ops.push(unary_operator(instr)?),
                other => {
                    return Err(JitError::Unsupported(other.mnemonic().to_string()));
                }
            }
        }

        self.programs_compiled += 1;
        Ok(CompiledProgram::new(ops))
    }

    /// Number of programs successfully compiled so far.
    pub fn programs_compiled(&self) -> u64 {
        self.programs_compiled
    }
}

fn integer_literal(instr: &Instruction) -> Result<i64, JitError> {
    let operand = instr
        .operand(0)
        .ok_or_else(|| JitError::Unsupported("missing literal operand".into()))?;
    if operand.quoted {
        return Err(JitError::Unsupported("string literal".into()));
    }
    operand
        .text
        .parse::<i64>()
        .map_err(|_| JitError::Unsupported(format!("non-integer literal: {}", operand.text)))
}

fn binary_operator(instr: &Instruction) -> Result<LoweredOp, JitError> {
    let op = instr
        .operand(0)
        .ok_or_else(|| JitError::Unsupported("missing operator".into()))?;
    match op.as_str() {
        "+" => Ok(LoweredOp::Add),
        "-" => Ok(LoweredOp::Sub),
        "*" => Ok(LoweredOp::Mul),
        "/" => Ok(LoweredOp::Div),
        "%" => Ok(LoweredOp::Rem),
        other => Err(JitError::Unsupported(format!("operator {}", other))),
    }
}

fn unary_operator(instr: &Instruction) -> Result<LoweredOp, JitError> {
    let op = instr
        .operand(0)
        .ok_or_else(|| JitError::Unsupported("missing operator".into()))?;
    match op.as_str() {
        "-" => Ok(LoweredOp::Neg),
        other => Err(JitError::Unsupported(format!("unary operator {}", other))),
    }
}
