//! Per-runtime host state.

use std::cell::RefCell;
use std::io::{self, BufRead};
use std::rc::Rc;

use memory_manager::{GarbageCollector, RawMemory};

use crate::console::Console;
use crate::file_table::FileTable;

/// The host services a builtin (or the interpreter) can reach.
///
/// One `HostContext` exists per runtime instance; nothing here is a
/// process-wide singleton, so runtimes can be constructed freely in
/// tests.
pub struct HostContext {
    /// The managed heap and collector.
    pub gc: GarbageCollector,
    /// Raw allocations backing MEM_malloc / MEM_free.
    pub raw: RawMemory,
    /// Open file handles.
    pub files: FileTable,
    /// Program-observable stdout.
    pub console: Console,
    stdin: Box<dyn BufRead>,
}

impl HostContext {
    /// Create a host wired to real stdin and stdout.
    pub fn new() -> Self {
        Self {
            gc: GarbageCollector::new(),
            raw: RawMemory::new(),
            files: FileTable::new(),
            console: Console::new(),
            stdin: Box::new(io::BufReader::new(io::stdin())),
        }
    }

    /// Create a host with captured stdout and scripted stdin.
    ///
    /// Returns the host together with the capture buffer holding every
    /// line the program prints.
    pub fn with_io(input: &str) -> (Self, Rc<RefCell<Vec<String>>>) {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let host = Self {
            gc: GarbageCollector::new(),
            raw: RawMemory::new(),
            files: FileTable::new(),
            console: Console::with_capture(buffer.clone()),
            stdin: Box::new(io::Cursor::new(input.to_string())),
        };
        (host, buffer)
    }

    /// Read one line from standard input, without the trailing newline.
    pub fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.stdin.read_line(&mut line)?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }
}

impl Default for HostContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("gc", &self.gc)
            .field("raw", &self.raw)
            .field("files", &self.files)
            .field("console", &self.console)
            .finish()
    }
}
