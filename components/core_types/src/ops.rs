//! Binary and unary operator semantics.
//!
//! Operator dispatch is keyed on the variant pair of the operands, in a
//! fixed precedence order: float promotion first, then integer math, then
//! the string, pointer, list, and dict special cases. Anything else is a
//! type error.

use crate::{ListValue, Value, VmError, VmResult};

/// Apply a binary operator to two values.
///
/// Coercion rules:
///
/// - If either operand is a double, both are promoted to double; `/` by
///   zero is a runtime error.
/// - If both are integers, 32-bit wrapping arithmetic applies unless
///   either operand is a long, which promotes the result to 64 bits; `/`
///   and `%` by zero are runtime errors.
/// - Strings support `+` (concatenation) and `==`/`!=` (content).
/// - Pointers support `==`/`!=` on the raw address, with two nulls equal.
/// - `list + list` concatenates, `list * n` replicates (negative `n`
///   yields an empty list).
/// - `dict == dict` is element-wise.
///
/// Any other combination fails with a type error carrying `line`.
pub fn binary_op(left: &Value, right: &Value, op: &str, line: u32) -> VmResult<Value> {
    if matches!(left, Value::Double(_)) || matches!(right, Value::Double(_)) {
        return float_binary_op(left.as_f64(), right.as_f64(), op, line);
    }

    if left.is_integer() && right.is_integer() {
        return integer_binary_op(left, right, op, line);
    }

    if let (Value::Str(l), Value::Str(r)) = (left, right) {
        return match op {
            "+" => Ok(Value::Str(format!("{}{}", l, r))),
            "==" => Ok(Value::Boolean(l == r)),
            "!=" => Ok(Value::Boolean(l != r)),
            _ => Err(
                VmError::type_error(format!("Unsupported operator for string: {}", op))
                    .with_line(line),
            ),
        };
    }

    if matches!(left, Value::Pointer(_)) || matches!(right, Value::Pointer(_)) {
        return pointer_binary_op(left, right, op, line);
    }

    if let (Value::List(l), Value::List(r)) = (left, right) {
        if op == "+" {
            let mut items = l.items.borrow().clone();
            items.extend(r.items.borrow().iter().cloned());
            return Ok(Value::List(ListValue::from_vec(items)));
        }
    }

    if let Value::List(l) = left {
        if op == "*" && right.is_integer() {
            let repetitions = right.as_i64();
            let source = l.items.borrow();
            let mut items = Vec::new();
            for _ in 0..repetitions.max(0) {
                items.extend(source.iter().cloned());
            }
            return Ok(Value::List(ListValue::from_vec(items)));
        }
    }

    if let (Value::Dict(l), Value::Dict(r)) = (left, right) {
        if op == "==" {
            return Ok(Value::Boolean(dict_eq(l, r)));
        }
    }

    Err(VmError::type_error("Binary operation type mismatch").with_line(line))
}

/// Apply a unary operator to a value.
///
/// `-` negates a numeric operand; `!` and `not` yield the boolean negation
/// of truthiness. Anything else is a type error.
pub fn unary_op(operand: &Value, op: &str, line: u32) -> VmResult<Value> {
    match op {
        "-" => match operand {
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            Value::Long(n) => Ok(Value::Long(n.wrapping_neg())),
            Value::Double(n) => Ok(Value::Double(-n)),
            _ => Err(
                VmError::type_error("Invalid operand type for unary minus").with_line(line),
            ),
        },
        "!" | "not" => Ok(Value::Boolean(!operand.is_truthy())),
        _ => Err(
            VmError::type_error(format!("Unsupported unary operator: {}", op)).with_line(line),
        ),
    }
}

fn float_binary_op(left: f64, right: f64, op: &str, line: u32) -> VmResult<Value> {
    match op {
        "+" => Ok(Value::Double(left + right)),
        "-" => Ok(Value::Double(left - right)),
        "*" => Ok(Value::Double(left * right)),
        "/" => {
            if right == 0.0 {
                Err(VmError::runtime("Division by zero error").with_line(line))
            } else {
                Ok(Value::Double(left / right))
            }
        }
        "==" => Ok(Value::Boolean(left == right)),
        "!=" => Ok(Value::Boolean(left != right)),
        "<" => Ok(Value::Boolean(left < right)),
        ">" => Ok(Value::Boolean(left > right)),
        "<=" => Ok(Value::Boolean(left <= right)),
        ">=" => Ok(Value::Boolean(left >= right)),
        "and" | "&&" => Ok(Value::Boolean(left != 0.0 && right != 0.0)),
        "or" | "||" => Ok(Value::Boolean(left != 0.0 || right != 0.0)),
        _ => Err(
            VmError::type_error(format!("Unsupported operator for floating point: {}", op))
                .with_line(line),
        ),
    }
}

fn integer_binary_op(left: &Value, right: &Value, op: &str, line: u32) -> VmResult<Value> {
    // Int op Int stays 32-bit; any Long promotes the result to 64 bits.
    if let (Value::Int(l), Value::Int(r)) = (left, right) {
        return int32_binary_op(*l, *r, op, line);
    }
    int64_binary_op(left.as_i64(), right.as_i64(), op, line)
}

fn int32_binary_op(left: i32, right: i32, op: &str, line: u32) -> VmResult<Value> {
    match op {
        "+" => Ok(Value::Int(left.wrapping_add(right))),
        "-" => Ok(Value::Int(left.wrapping_sub(right))),
        "*" => Ok(Value::Int(left.wrapping_mul(right))),
        "/" => {
            if right == 0 {
                Err(VmError::runtime("Division by zero error").with_line(line))
            } else {
                Ok(Value::Int(left.wrapping_div(right)))
            }
        }
        "%" => {
            if right == 0 {
                Err(VmError::runtime("Modulo by zero error").with_line(line))
            } else {
                Ok(Value::Int(left.wrapping_rem(right)))
            }
        }
        _ => integer_compare(left as i64, right as i64, op, line),
    }
}

fn int64_binary_op(left: i64, right: i64, op: &str, line: u32) -> VmResult<Value> {
    match op {
        "+" => Ok(Value::Long(left.wrapping_add(right))),
        "-" => Ok(Value::Long(left.wrapping_sub(right))),
        "*" => Ok(Value::Long(left.wrapping_mul(right))),
        "/" => {
            if right == 0 {
                Err(VmError::runtime("Division by zero error").with_line(line))
            } else {
                Ok(Value::Long(left.wrapping_div(right)))
            }
        }
        "%" => {
            if right == 0 {
                Err(VmError::runtime("Modulo by zero error").with_line(line))
            } else {
                Ok(Value::Long(left.wrapping_rem(right)))
            }
        }
        _ => integer_compare(left, right, op, line),
    }
}

fn integer_compare(left: i64, right: i64, op: &str, line: u32) -> VmResult<Value> {
    match op {
        "==" => Ok(Value::Boolean(left == right)),
        "!=" => Ok(Value::Boolean(left != right)),
        "<" => Ok(Value::Boolean(left < right)),
        ">" => Ok(Value::Boolean(left > right)),
        "<=" => Ok(Value::Boolean(left <= right)),
        ">=" => Ok(Value::Boolean(left >= right)),
        "and" | "&&" => Ok(Value::Boolean(left != 0 && right != 0)),
        "or" | "||" => Ok(Value::Boolean(left != 0 || right != 0)),
        _ => Err(
            VmError::type_error(format!("Unsupported operator for integer: {}", op))
                .with_line(line),
        ),
    }
}

fn pointer_binary_op(left: &Value, right: &Value, op: &str, line: u32) -> VmResult<Value> {
    match op {
        "==" | "!=" => {
            let equal = match (left, right) {
                (Value::Pointer(l), Value::Pointer(r)) => l.address() == r.address(),
                // Comparing a pointer to a non-pointer: equal only when
                // both sides are null-like.
                (Value::Pointer(l), _) => l.is_null && matches!(right, Value::Null),
                (_, Value::Pointer(r)) => r.is_null && matches!(left, Value::Null),
                _ => false,
            };
            Ok(Value::Boolean(if op == "==" { equal } else { !equal }))
        }
        _ => Err(
            VmError::type_error(format!("Unsupported operator for pointer: {}", op))
                .with_line(line),
        ),
    }
}

fn dict_eq(left: &crate::DictValue, right: &crate::DictValue) -> bool {
    let l = left.items.borrow();
    let r = right.items.borrow();
    if l.len() != r.len() {
        return false;
    }
    l.iter().all(|(k, v)| r.get(k) == Some(v))
}
