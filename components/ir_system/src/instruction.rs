//! Decoded instruction representation.

use std::fmt;

use crate::opcode::Opcode;

/// A single decoded operand.
///
/// The decoder unquotes string operands but remembers that they were
/// quoted, because consumers must be able to tell the string literal
/// `LOAD "x"` apart from the variable reference `LOAD x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    /// The operand text with quotes removed.
    pub text: String,
    /// Whether the operand was double-quoted in the IR.
    pub quoted: bool,
}

impl Operand {
    /// A bare (unquoted) operand.
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    /// A quoted string operand.
    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    /// The operand text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

/// A decoded IR instruction: opcode, source line, and operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The opcode tag.
    pub opcode: Opcode,
    /// Source line in the IR text (1-based).
    pub line: u32,
    /// Ordered operand list.
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Create an instruction with no operands.
    pub fn new(opcode: Opcode, line: u32) -> Self {
        Self {
            opcode,
            line,
            operands: Vec::new(),
        }
    }

    /// Create an instruction with the given operands.
    pub fn with_operands(opcode: Opcode, line: u32, operands: Vec<Operand>) -> Self {
        Self {
            opcode,
            line,
            operands,
        }
    }

    /// Borrow operand `index` if present.
    pub fn operand(&self, index: usize) -> Option<&Operand> {
        self.operands.get(index)
    }

    /// Render this instruction back to one line of IR text.
    ///
    /// Quoted operands are re-quoted, so `decode(emit(i))` yields an
    /// instruction equal to `i`.
    pub fn emit(&self) -> String {
        let mut line = self.opcode.mnemonic().to_string();
        for operand in &self.operands {
            line.push(' ');
            line.push_str(&operand.to_string());
        }
        line
    }
}
