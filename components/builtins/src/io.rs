//! Console and file builtins.

use std::io::{Read, Write};

use core_types::{PointerValue, Value, VmError, VmResult};

use crate::host::HostContext;

/// `print(x)` - print the textual rendering of `x` and a newline.
pub fn print(host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let text = match args.first() {
        Some(value) => value.to_string(),
        None => String::new(),
    };
    host.console.write_line(&text);
    Ok(Value::Null)
}

/// `input()` - read one line from standard input.
pub fn input(host: &mut HostContext, _args: &[Value]) -> VmResult<Value> {
    let line = host
        .read_line()
        .map_err(|e| VmError::runtime(format!("Failed to read input: {}", e)))?;
    Ok(Value::Str(line))
}

/// `open(path, mode?)` - open a file and return a pointer-shaped handle.
///
/// The handle id is stored in a managed cell tagged `"file"`; a failed
/// open writes a diagnostic to stderr and returns a null pointer.
pub fn open(host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let path = match args.first() {
        Some(Value::Str(s)) => s.clone(),
        _ => return Ok(Value::Pointer(PointerValue::null())),
    };
    let mode = match args.get(1) {
        Some(Value::Str(s)) => s.clone(),
        _ => "r".to_string(),
    };

    match host.files.open(&path, &mode) {
        Ok(id) => {
            let handle = host.gc.allocate_with_tag(8, "file")?;
            if let Some(cell) = host.gc.get_mut(handle) {
                cell.write_i64(id);
            }
            Ok(Value::Pointer(PointerValue::new(handle, "file")))
        }
        Err(_) => {
            eprintln!("Error: Could not open file: {}", path);
            Ok(Value::Pointer(PointerValue::null()))
        }
    }
}

/// `close(h)` - close a file handle.
///
/// Removes the handle from the file table and its cell from the managed
/// heap. Closing an already-closed handle returns `-1` without faulting.
pub fn close(host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let ptr = match args.first() {
        Some(Value::Pointer(p)) if !p.is_null => p.clone(),
        _ => {
            eprintln!("Error: Cannot close null file handle");
            return Ok(Value::Int(-1));
        }
    };

    let id = match host.gc.get(ptr.handle) {
        Some(cell) => cell.read_i64(),
        None => {
            eprintln!("Error: Invalid file handle");
            return Ok(Value::Int(-1));
        }
    };

    if host.files.close(id) {
        host.gc.deallocate(ptr.handle);
        Ok(Value::Int(0))
    } else {
        eprintln!("Error: Invalid file handle");
        Ok(Value::Int(-1))
    }
}

/// `read(h)` - read the remaining content of a file as a string.
pub fn read(host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let handle = match resolve_file_id(host, args.first()) {
        Some(id) => id,
        None => {
            eprintln!("Error: Invalid file handle for read");
            return Ok(Value::Str(String::new()));
        }
    };

    match host.files.get_mut(handle).and_then(|h| h.file.as_mut()) {
        Some(file) => {
            let mut content = String::new();
            match file.read_to_string(&mut content) {
                Ok(_) => Ok(Value::Str(content)),
                Err(e) => {
                    eprintln!("Error: File read failed: {}", e);
                    Ok(Value::Str(String::new()))
                }
            }
        }
        None => {
            eprintln!("Error: File not open for reading");
            Ok(Value::Str(String::new()))
        }
    }
}

/// `write(h, text)` - write text to a file, returning the number of
/// bytes written.
pub fn write(host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let handle = match resolve_file_id(host, args.first()) {
        Some(id) => id,
        None => {
            eprintln!("Error: Invalid file handle for write");
            return Ok(Value::Int(-1));
        }
    };
    let content = match args.get(1) {
        Some(value) => value.to_string(),
        None => {
            eprintln!("Error: Missing content for write");
            return Ok(Value::Int(-1));
        }
    };

    match host.files.get_mut(handle).and_then(|h| h.file.as_mut()) {
        Some(file) => {
            match file
                .write_all(content.as_bytes())
                .and_then(|_| file.flush())
            {
                Ok(_) => Ok(Value::Int(content.len() as i32)),
                Err(e) => {
                    eprintln!("Error: File write failed: {}", e);
                    Ok(Value::Int(-1))
                }
            }
        }
        None => {
            eprintln!("Error: File not open for writing");
            Ok(Value::Int(-1))
        }
    }
}

/// `throw(msg)` - raise a runtime error carrying the message.
pub fn throw(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let message = match args.first() {
        Some(Value::Str(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "Exception thrown".to_string(),
    };
    Err(VmError::runtime(message))
}

/// Map a pointer-shaped file handle back to its table id.
fn resolve_file_id(host: &HostContext, value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Pointer(p)) if !p.is_null => host.gc.get(p.handle).map(|cell| cell.read_i64()),
        _ => None,
    }
}
