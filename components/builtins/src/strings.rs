//! String builtins.

use core_types::{Value, VmResult};

use crate::host::HostContext;

/// `substr(s, start, len?)` - substring with clamping.
///
/// Offsets are in characters. A negative start or length clamps to zero;
/// a start past the end yields the empty string; a length past the end is
/// truncated.
pub fn substr(_host: &mut HostContext, args: &[Value]) -> VmResult<Value> {
    let text = match args.first() {
        Some(Value::Str(s)) => s,
        _ => return Ok(Value::Str(String::new())),
    };
    if args.len() < 2 {
        return Ok(Value::Str(String::new()));
    }

    let char_count = text.chars().count() as i64;
    let start = args[1].as_i64().max(0);
    if start >= char_count {
        return Ok(Value::Str(String::new()));
    }

    let length = match args.get(2) {
        Some(v) => v.as_i64().max(0),
        None => char_count - start,
    };
    let length = length.min(char_count - start);

    let result: String = text
        .chars()
        .skip(start as usize)
        .take(length as usize)
        .collect();
    Ok(Value::Str(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HostContext {
        HostContext::with_io("").0
    }

    fn s(text: &str) -> Value {
        Value::Str(text.into())
    }

    #[test]
    fn test_substr_basic() {
        let mut h = host();
        assert_eq!(
            substr(&mut h, &[s("hello"), Value::Int(1), Value::Int(3)]).unwrap(),
            s("ell")
        );
    }

    #[test]
    fn test_substr_defaults_to_rest() {
        let mut h = host();
        assert_eq!(substr(&mut h, &[s("hello"), Value::Int(2)]).unwrap(), s("llo"));
    }

    #[test]
    fn test_substr_clamping() {
        let mut h = host();
        // Negative start clamps to zero
        assert_eq!(
            substr(&mut h, &[s("abc"), Value::Int(-5), Value::Int(2)]).unwrap(),
            s("ab")
        );
        // Start past the end yields empty
        assert_eq!(
            substr(&mut h, &[s("abc"), Value::Int(10), Value::Int(2)]).unwrap(),
            s("")
        );
        // Negative length clamps to zero
        assert_eq!(
            substr(&mut h, &[s("abc"), Value::Int(1), Value::Int(-1)]).unwrap(),
            s("")
        );
        // Length past the end is truncated
        assert_eq!(
            substr(&mut h, &[s("abc"), Value::Int(1), Value::Int(99)]).unwrap(),
            s("bc")
        );
    }

    #[test]
    fn test_substr_non_string_is_empty() {
        let mut h = host();
        assert_eq!(
            substr(&mut h, &[Value::Int(5), Value::Int(0)]).unwrap(),
            s("")
        );
        assert_eq!(substr(&mut h, &[s("abc")]).unwrap(), s(""));
    }
}
