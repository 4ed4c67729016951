//! Open file resources mapped to opaque handle ids.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io;

/// Handle ids start here so they never alias small numeric literals a
/// program might push as ids.
const FIRST_HANDLE_ID: i64 = 1000;

/// An open stream plus its filename, mode, and open flag.
#[derive(Debug)]
pub struct FileHandle {
    /// The open stream, present while the handle is open.
    pub file: Option<File>,
    /// Path the handle was opened with.
    pub filename: String,
    /// Mode string the handle was opened with.
    pub mode: String,
    /// Whether the stream is still open.
    pub is_open: bool,
}

/// Table of open file handles keyed by monotonically increasing ids.
///
/// Modes: `r` reads, `w` writes (truncating), `a` appends; a `+` adds the
/// opposite direction. `close` is idempotent: closing an unknown id is an
/// error code, not a fault.
#[derive(Debug, Default)]
pub struct FileTable {
    handles: HashMap<i64, FileHandle>,
    next_id: i64,
}

impl FileTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
            next_id: FIRST_HANDLE_ID,
        }
    }

    /// Open `path` with the given mode string and return the handle id.
    pub fn open(&mut self, path: &str, mode: &str) -> io::Result<i64> {
        let mut options = OpenOptions::new();
        if mode.contains('w') {
            options.write(true).create(true).truncate(true);
        } else if mode.contains('a') {
            options.append(true).create(true);
        } else {
            options.read(true);
        }
        if mode.contains('+') {
            options.read(true).write(true);
        }

        let file = options.open(path)?;
        let id = self.next_id;
        self.next_id += 1;
        self.handles.insert(
            id,
            FileHandle {
                file: Some(file),
                filename: path.to_string(),
                mode: mode.to_string(),
                is_open: true,
            },
        );
        Ok(id)
    }

    /// Mutably borrow the handle for `id`.
    pub fn get_mut(&mut self, id: i64) -> Option<&mut FileHandle> {
        self.handles.get_mut(&id)
    }

    /// Close and remove the handle for `id`.
    ///
    /// Returns false when the id is unknown (already closed).
    pub fn close(&mut self, id: i64) -> bool {
        match self.handles.remove(&id) {
            Some(mut handle) => {
                handle.is_open = false;
                handle.file.take();
                true
            }
            None => false,
        }
    }

    /// Close every handle still open. Called at runtime teardown.
    pub fn close_all(&mut self) {
        self.handles.clear();
    }

    /// Number of open handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True when no handles are open.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
