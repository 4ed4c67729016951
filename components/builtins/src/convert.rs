//! Type conversion, type inspection, and hashing builtins.

use std::hash::{Hash, Hasher};

use core_types::{Value, VmResult};
use rustc_hash::FxHasher;

use crate::host::HostContext;

/// `int(x)` - coerce to a 32-bit integer.
pub fn int(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let value = match args.first() {
        Some(Value::Str(s)) => s.trim().parse::<i32>().unwrap_or(0),
        Some(Value::Double(n)) => *n as i32,
        Some(Value::Long(n)) => *n as i32,
        Some(Value::Boolean(b)) => *b as i32,
        Some(Value::Int(n)) => *n,
        _ => 0,
    };
    Ok(Value::Int(value))
}

/// `float(x)` - coerce to a double.
pub fn float(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let value = match args.first() {
        Some(Value::Str(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Int(n)) => *n as f64,
        Some(Value::Long(n)) => *n as f64,
        Some(Value::Boolean(b)) => *b as i32 as f64,
        Some(Value::Double(n)) => *n,
        _ => 0.0,
    };
    Ok(Value::Double(value))
}

/// `string(x)` - textual rendering.
pub fn string(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let text = match args.first() {
        Some(value) => value.to_string(),
        None => String::new(),
    };
    Ok(Value::Str(text))
}

/// `bool(x)` - coerce to a boolean.
///
/// For strings this is a parser: `"false"`, `"0"`, and `""` are false,
/// case-insensitively. Every other shape follows ordinary truthiness.
pub fn bool_(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let value = match args.first() {
        Some(Value::Str(s)) => {
            let lower = s.to_lowercase();
            lower != "false" && lower != "0" && !lower.is_empty()
        }
        Some(other) => other.is_truthy(),
        None => false,
    };
    Ok(Value::Boolean(value))
}

/// `type(x)` - the textual type tag.
pub fn type_(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let tag = match args.first() {
        Some(value) => value.type_tag(),
        None => "unknown".to_string(),
    };
    Ok(Value::Str(tag))
}

/// `hash(x)` - 64-bit host-stable hash.
///
/// Equal values of comparable type hash equally: `Int`, `Long`, and
/// booleans hash through their 64-bit value, integral doubles hash like
/// the integer they equal.
pub fn hash(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let mut hasher = FxHasher::default();
    match args.first() {
        Some(Value::Str(s)) => s.hash(&mut hasher),
        Some(Value::Double(n)) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                (*n as i64).hash(&mut hasher);
            } else {
                n.to_bits().hash(&mut hasher);
            }
        }
        Some(v @ (Value::Int(_) | Value::Long(_) | Value::Boolean(_))) => {
            v.as_i64().hash(&mut hasher);
        }
        Some(other) => other.type_tag().hash(&mut hasher),
        None => return Ok(Value::Long(0)),
    }
    Ok(Value::Long(hasher.finish() as i64))
}
