//! List and container builtins.

use core_types::{ListValue, Value, VmResult};

use crate::host::HostContext;

/// `list(...)` - construct a list from all arguments.
pub fn list(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    Ok(Value::List(ListValue::from_vec(args.to_vec())))
}

/// `append(list, item)` - append and return the list.
///
/// Lists share their storage, so the append is visible through every
/// alias of the list. A non-list first argument is returned unchanged.
pub fn append(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    match (args.first(), args.get(1)) {
        (Some(Value::List(l)), Some(item)) => {
            l.push(item.clone());
            Ok(Value::List(l.clone()))
        }
        (Some(other), _) => Ok(other.clone()),
        (None, _) => Ok(Value::Int(0)),
    }
}

/// `len(x)` - length of a string, list, or dict; zero otherwise.
pub fn len(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let value = match args.first() {
        Some(Value::Str(s)) => s.chars().count() as i32,
        Some(Value::List(l)) => l.len() as i32,
        Some(Value::Dict(d)) => d.len() as i32,
        _ => 0,
    };
    Ok(Value::Int(value))
}
