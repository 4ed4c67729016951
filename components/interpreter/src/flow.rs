//! Control-flow scanning.
//!
//! `IF`/`ELSE`/`END` and `WHILE`/`DO`/`END` are not indexed ahead of
//! time: the runtime scans forward from the current PC with a depth
//! counter (`IF`/`WHILE` open, `END` closes) to find the matching `ELSE`
//! or `END`. A missing `END` resolves to "jump to end of program".

use ir_system::{Instruction, Opcode};

/// Find the matching `ELSE` (at the same depth) or `END` for the block
/// opened at `from`. Returns the instruction index, or `None` when the
/// block is unterminated.
pub(crate) fn find_else_or_end(program: &[Instruction], from: usize) -> Option<usize> {
    let mut depth = 1;
    let mut current = from + 1;
    while current < program.len() {
        let opcode = program[current].opcode;
        if opcode.opens_block() {
            depth += 1;
        } else if opcode.closes_block() {
            depth -= 1;
            if depth == 0 {
                return Some(current);
            }
        } else if opcode == Opcode::Else && depth == 1 {
            return Some(current);
        }
        current += 1;
    }
    None
}

/// Find the matching `END` for the block opened at `from`.
pub(crate) fn find_end(program: &[Instruction], from: usize) -> Option<usize> {
    let mut depth = 1;
    let mut current = from + 1;
    while current < program.len() {
        let opcode = program[current].opcode;
        if opcode.opens_block() {
            depth += 1;
        } else if opcode.closes_block() {
            depth -= 1;
            if depth == 0 {
                return Some(current);
            }
        }
        current += 1;
    }
    None
}

/// Find the `LABEL` whose first operand equals `label`.
pub(crate) fn find_label(program: &[Instruction], label: &str) -> Option<usize> {
    program.iter().position(|instr| {
        instr.opcode == Opcode::Label
            && instr
                .operand(0)
                .map(|op| op.as_str() == label)
                .unwrap_or(false)
    })
}
