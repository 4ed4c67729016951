//! Program-observable console output.

use std::cell::RefCell;
use std::rc::Rc;

/// Console output writer trait.
pub trait ConsoleWriter {
    /// Write one line to the console output.
    fn write_line(&self, line: &str);
}

/// Default writer that prints to stdout.
struct StdoutWriter;

impl ConsoleWriter for StdoutWriter {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Writer used in capture mode; output is already recorded by the console.
struct SilentWriter;

impl ConsoleWriter for SilentWriter {
    fn write_line(&self, _line: &str) {}
}

/// Console used for everything the program can observe on stdout.
///
/// Every line is recorded in the capture buffer in addition to being
/// handed to the writer, so tests can assert on the exact stdout of a run
/// without spawning a process.
pub struct Console {
    output: Rc<RefCell<Vec<String>>>,
    writer: Box<dyn ConsoleWriter>,
}

impl Console {
    /// Create a console that prints to stdout.
    pub fn new() -> Self {
        Console {
            output: Rc::new(RefCell::new(Vec::new())),
            writer: Box::new(StdoutWriter),
        }
    }

    /// Create a console that only records into the given buffer.
    pub fn with_capture(output: Rc<RefCell<Vec<String>>>) -> Self {
        Console {
            output,
            writer: Box::new(SilentWriter),
        }
    }

    /// Emit one line of program output.
    pub fn write_line(&self, line: &str) {
        self.output.borrow_mut().push(line.to_string());
        self.writer.write_line(line);
    }

    /// Lines emitted so far.
    pub fn captured(&self) -> Vec<String> {
        self.output.borrow().clone()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("lines", &self.output.borrow().len())
            .finish()
    }
}
