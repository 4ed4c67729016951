//! Interactive debugger prompt.

use std::io::{self, BufRead, Write};

use interpreter::{DebugCommand, DebugInterface};

/// Debugger front end reading commands from standard input.
///
/// The pause status and prompt go to stderr so the program's own stdout
/// stays clean.
#[derive(Debug, Default)]
pub struct StdinDebugger;

impl StdinDebugger {
    /// Create a stdin-backed debugger interface.
    pub fn new() -> Self {
        Self
    }

    fn parse(input: &str) -> Option<DebugCommand> {
        match input.trim() {
            "s" | "step" => Some(DebugCommand::Step),
            "n" | "next" => Some(DebugCommand::StepOver),
            "i" | "into" => Some(DebugCommand::StepInto),
            "o" | "out" | "finish" => Some(DebugCommand::StepOut),
            "c" | "continue" => Some(DebugCommand::Continue),
            "q" | "quit" => Some(DebugCommand::Break),
            _ => None,
        }
    }
}

impl DebugInterface for StdinDebugger {
    fn on_pause(&mut self, status: &str) -> DebugCommand {
        eprintln!("{}", status);

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            eprint!("(sdb) ");
            io::stderr().flush().ok();

            let line = match lines.next() {
                Some(Ok(line)) => line,
                // EOF or read failure: keep running.
                _ => return DebugCommand::Continue,
            };

            match Self::parse(&line) {
                Some(command) => return command,
                None => {
                    eprintln!(
                        "commands: s(tep), n(ext), i(nto), o(ut), c(ontinue), q(uit)"
                    );
                }
            }
        }
    }
}
