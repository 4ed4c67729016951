//! Numeric builtins.

use core_types::{Value, VmResult};

use crate::host::HostContext;

/// `abs(x)` - absolute value, preserving the numeric variant.
pub fn abs(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let value = match args.first() {
        Some(Value::Int(n)) => Value::Int(n.wrapping_abs()),
        Some(Value::Long(n)) => Value::Long(n.wrapping_abs()),
        Some(Value::Double(n)) => Value::Double(n.abs()),
        _ => Value::Int(0),
    };
    Ok(value)
}

/// `pow(b, e)` - exponentiation, with integers preserved when possible.
///
/// An integer base with a non-negative integer exponent stays integral
/// unless the result overflows 64 bits, in which case (and for all float
/// inputs) the result is a double.
pub fn pow(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let (base, exponent) = match (args.first(), args.get(1)) {
        (Some(b), Some(e)) => (b, e),
        _ => return Ok(Value::Double(1.0)),
    };

    if base.is_integer() && exponent.is_integer() {
        let e = exponent.as_i64();
        if e >= 0 {
            if let Ok(e32) = u32::try_from(e) {
                if let Some(result) = base.as_i64().checked_pow(e32) {
                    if let (Value::Int(_), Ok(small)) = (base, i32::try_from(result)) {
                        return Ok(Value::Int(small));
                    }
                    return Ok(Value::Long(result));
                }
            }
        }
    }

    Ok(Value::Double(base.as_f64().powf(exponent.as_f64())))
}
