//! Pointer and managed-object builtins.

use core_types::{PointerValue, Value, VmResult};

use crate::host::HostContext;

fn size_for_tag(tag: &str) -> usize {
    match tag {
        "int" | "bool" => 4,
        "float" | "double" | "long" => 8,
        "string" => 24,
        _ => 8,
    }
}

/// `new(typeTag)` - allocate a managed object initialized to the zero
/// value of the tag and return a pointer to it.
pub fn new_(host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let tag = match args.first() {
        Some(Value::Str(s)) => s.clone(),
        Some(other) => other.type_tag(),
        None => return Ok(Value::Pointer(PointerValue::null())),
    };

    let handle = host.gc.allocate_with_tag(size_for_tag(&tag), tag.clone())?;
    Ok(Value::Pointer(PointerValue::new(handle, tag)))
}

/// `deref(ptr)` - dereference for display.
///
/// Scalar-tagged cells decode their zero-initialized payload back to a
/// value; anything else renders as a bracketed description. A null
/// pointer renders as `"null"`.
pub fn deref(host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let ptr = match args.first() {
        Some(Value::Pointer(p)) => p,
        _ => return Ok(Value::Str("null".into())),
    };
    if ptr.is_null {
        return Ok(Value::Str("null".into()));
    }

    let object = host
        .gc
        .get(ptr.handle)
        .ok_or_else(|| core_types::VmError::runtime("Dereference of reclaimed object"))?;

    let value = match object.type_tag.as_str() {
        "int" => Value::Int(object.read_i64() as i32),
        "bool" => Value::Boolean(object.read_i64() != 0),
        "long" => Value::Long(object.read_i64()),
        "float" | "double" => Value::Double(object.read_f64()),
        tag => Value::Str(format!("[ptr_data:{}]", tag)),
    };
    Ok(value)
}

/// `del(x)` - if `x` is a pointer, free its cell and remove it from the
/// heap.
pub fn del(host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    match args.first() {
        Some(Value::Pointer(p)) => {
            if !p.is_null {
                host.gc.deallocate(p.handle);
            }
            Ok(Value::Int(0))
        }
        Some(_) => Ok(Value::Int(0)),
        None => Ok(Value::Int(-1)),
    }
}
