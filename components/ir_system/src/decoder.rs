//! Textual IR decoder.
//!
//! Line discipline:
//!
//! - Blank lines and lines whose first non-whitespace character is `;`
//!   are skipped.
//! - Lines containing `# IR BEGIN` or `IR END` are delimiters and are
//!   skipped.
//! - Everything from the first `;` on is stripped as a comment.
//! - The first whitespace-delimited token is the opcode mnemonic; the
//!   rest are operands. A token wrapped in double quotes is unquoted (and
//!   remembered as quoted); a bare token loses one trailing comma.
//!
//! Unknown mnemonics decode to `NOP` with the source line preserved so
//! diagnostics can still point at them.

use crate::instruction::{Instruction, Operand};
use crate::opcode::Opcode;

/// Decode an IR text blob into an instruction vector.
///
/// Source lines are numbered from 1 across the whole blob, including the
/// lines the decoder skips.
pub fn decode(source: &str) -> Vec<Instruction> {
    let mut instructions = Vec::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line_num = (index + 1) as u32;

        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }
        if trimmed.contains("# IR BEGIN") || trimmed.contains("IR END") {
            continue;
        }

        // Strip trailing comment, then re-trim.
        let code = match trimmed.find(';') {
            Some(pos) => trimmed[..pos].trim(),
            None => trimmed,
        };
        if code.is_empty() {
            continue;
        }

        let mut tokens = code.split_whitespace();
        let mnemonic = match tokens.next() {
            Some(t) => t,
            None => continue,
        };

        let opcode = Opcode::from_mnemonic(mnemonic);
        let operands = tokens.map(decode_operand).collect();
        instructions.push(Instruction::with_operands(opcode, line_num, operands));
    }

    instructions
}

fn decode_operand(token: &str) -> Operand {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        Operand::quoted(&token[1..token.len() - 1])
    } else if let Some(stripped) = token.strip_suffix(',') {
        Operand::bare(stripped)
    } else {
        Operand::bare(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_simple_program() {
        let program = decode("LOAD 2\nLOAD 3\nBINARY_OP +\nPRINT\n");
        assert_eq!(program.len(), 4);
        assert_eq!(program[0].opcode, Opcode::Load);
        assert_eq!(program[0].operands[0].text, "2");
        assert_eq!(program[3].opcode, Opcode::Print);
        assert_eq!(program[3].line, 4);
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        let program = decode("\n; full line comment\n   ; indented comment\nNOP\n");
        assert_eq!(program.len(), 1);
        assert_eq!(program[0].opcode, Opcode::Nop);
        assert_eq!(program[0].line, 4);
    }

    #[test]
    fn test_delimiter_lines_skipped() {
        let program = decode("# IR BEGIN\nLOAD 1\n; IR END marker below\nIR END\n");
        assert_eq!(program.len(), 1);
        assert_eq!(program[0].opcode, Opcode::Load);
    }

    #[test]
    fn test_trailing_comment_stripped() {
        let program = decode("LOAD 5 ; the answer-ish\n");
        assert_eq!(program.len(), 1);
        assert_eq!(program[0].operands.len(), 1);
        assert_eq!(program[0].operands[0].text, "5");
    }

    #[test]
    fn test_comment_only_remainder_skipped() {
        let program = decode("   ;\nLOAD 1");
        assert_eq!(program.len(), 1);
        assert_eq!(program[0].line, 2);
    }

    #[test]
    fn test_quoted_operand_unquoted_and_flagged() {
        let program = decode("LOAD \"foo\"\n");
        let op = &program[0].operands[0];
        assert_eq!(op.text, "foo");
        assert!(op.quoted);
    }

    #[test]
    fn test_bare_operand_loses_trailing_comma() {
        let program = decode("CALL print,\n");
        assert_eq!(program[0].operands[0].text, "print");
        assert!(!program[0].operands[0].quoted);
    }

    #[test]
    fn test_unknown_mnemonic_preserves_line() {
        let program = decode("LOAD 1\nWIBBLE a b\nPRINT\n");
        assert_eq!(program[1].opcode, Opcode::Nop);
        assert_eq!(program[1].line, 2);
        assert_eq!(program[1].operands.len(), 2);
    }

    #[test]
    fn test_multiple_operands() {
        let program = decode("FUNC add2\n");
        assert_eq!(program[0].opcode, Opcode::Func);
        assert_eq!(program[0].operands[0].text, "add2");
    }

    #[test]
    fn test_round_trip_through_emit() {
        let original = decode("LOAD \"hello\"\nLOAD 3\nBINARY_OP +\nSTORE x,\nPRINT\n");
        let emitted: String = original
            .iter()
            .map(|i| i.emit())
            .collect::<Vec<_>>()
            .join("\n");
        let reparsed = decode(&emitted);

        assert_eq!(original.len(), reparsed.len());
        for (a, b) in original.iter().zip(reparsed.iter()) {
            assert_eq!(a.opcode, b.opcode);
            assert_eq!(a.operands, b.operands);
        }
    }

    #[test]
    fn test_line_numbers_count_skipped_lines() {
        let program = decode("; header\n\nLOAD 1\n\nPRINT\n");
        assert_eq!(program[0].line, 3);
        assert_eq!(program[1].line, 5);
    }
}
