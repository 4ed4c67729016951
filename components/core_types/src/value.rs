//! Runtime value representation.
//!
//! This module provides the core `Value` enum that represents every value
//! the interpreter can hold, along with the shared container and pointer
//! payloads.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Handle to a garbage-collected cell plus its pointer metadata.
///
/// The opaque handle issued by the collector doubles as the pointer's raw
/// address for equality purposes. A null pointer carries no handle.
///
/// # Invariants
///
/// - If `is_null` is set the pointer must not be dereferenced.
/// - `is_weak` pointers do not keep their referent alive across a
///   collection.
/// - `is_ref` pointers must never be null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerValue {
    /// Collector handle of the referent (0 when null).
    pub handle: u64,
    /// Type tag of the referent (`"object"`, `"file"`, `"int"`, ...).
    pub type_tag: String,
    /// Whether this pointer is null.
    pub is_null: bool,
    /// Whether this is a weak pointer.
    pub is_weak: bool,
    /// Whether this is a reference (cannot be null).
    pub is_ref: bool,
}

impl PointerValue {
    /// Create a non-null pointer to the given collector handle.
    pub fn new(handle: u64, type_tag: impl Into<String>) -> Self {
        Self {
            handle,
            type_tag: type_tag.into(),
            is_null: false,
            is_weak: false,
            is_ref: false,
        }
    }

    /// Create a null pointer.
    pub fn null() -> Self {
        Self {
            handle: 0,
            type_tag: String::new(),
            is_null: true,
            is_weak: false,
            is_ref: false,
        }
    }

    /// The raw address used for pointer comparison.
    pub fn address(&self) -> u64 {
        if self.is_null {
            0
        } else {
            self.handle
        }
    }
}

/// Ordered sequence of values with shared, heap-backed storage.
///
/// Cloning a `ListValue` clones the reference, not the elements; all
/// clones observe mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValue {
    /// Shared element storage.
    pub items: Rc<RefCell<Vec<Value>>>,
}

impl ListValue {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            items: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Create a list from the given elements.
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self {
            items: Rc::new(RefCell::new(items)),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// True when the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Append an element to the shared storage.
    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }
}

impl Default for ListValue {
    fn default() -> Self {
        Self::new()
    }
}

/// String-keyed mapping with shared, heap-backed storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DictValue {
    /// Shared entry storage.
    pub items: Rc<RefCell<HashMap<String, Value>>>,
}

impl DictValue {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self {
            items: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// True when the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Insert an entry into the shared storage.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.items.borrow_mut().insert(key.into(), value);
    }
}

impl Default for DictValue {
    fn default() -> Self {
        Self::new()
    }
}

/// A runtime value.
///
/// Primitive variants are copied by value; the heap-backed variants
/// (pointer, list, dict) share their payloads by reference.
///
/// # Examples
///
/// ```
/// use core_types::Value;
///
/// assert!(Value::Int(1).is_truthy());
/// assert!(!Value::Null.is_truthy());
/// assert_eq!(Value::Double(2.5).type_tag(), "float");
/// assert_eq!(Value::Str("hi".into()).to_string(), "hi");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// IEEE-754 double.
    Double(f64),
    /// Boolean.
    Boolean(bool),
    /// Owned text.
    Str(String),
    /// Null.
    Null,
    /// Handle to a garbage-collected cell.
    Pointer(PointerValue),
    /// Ordered sequence, shared by reference.
    List(ListValue),
    /// String-keyed mapping, shared by reference.
    Dict(DictValue),
}

impl Value {
    /// Returns whether this value is truthy.
    ///
    /// Nonzero numbers, non-empty strings, `true`, non-empty containers,
    /// and non-null pointers are truthy; everything else is falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Long(n) => *n != 0,
            Value::Double(n) => *n != 0.0,
            Value::Boolean(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::Null => false,
            Value::Pointer(p) => !p.is_null,
            Value::List(l) => !l.is_empty(),
            Value::Dict(d) => !d.is_empty(),
        }
    }

    /// Returns the textual type tag of this value.
    ///
    /// Pointers report the tag of their referent.
    pub fn type_tag(&self) -> String {
        match self {
            Value::Int(_) => "int".to_string(),
            Value::Long(_) => "long".to_string(),
            Value::Double(_) => "float".to_string(),
            Value::Boolean(_) => "bool".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::Null => "null".to_string(),
            Value::Pointer(p) => p.type_tag.clone(),
            Value::List(_) => "list".to_string(),
            Value::Dict(_) => "dict".to_string(),
        }
    }

    /// Numeric coercion to double.
    ///
    /// Containers coerce to their length; strings, null, and pointers to
    /// zero.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Long(n) => *n as f64,
            Value::Double(n) => *n,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::List(l) => l.len() as f64,
            Value::Dict(d) => d.len() as f64,
            _ => 0.0,
        }
    }

    /// Numeric coercion to a 64-bit integer.
    ///
    /// Pointers coerce to their raw address, containers to their length.
    pub fn as_i64(&self) -> i64 {
        match self {
            Value::Int(n) => *n as i64,
            Value::Long(n) => *n,
            Value::Double(n) => *n as i64,
            Value::Boolean(b) => *b as i64,
            Value::Pointer(p) => p.address() as i64,
            Value::List(l) => l.len() as i64,
            Value::Dict(d) => d.len() as i64,
            _ => 0,
        }
    }

    /// True for the `Int` and `Long` variants.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Long(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Double(n) => {
                if n.is_nan() {
                    write!(f, "nan")
                } else if n.is_infinite() {
                    write!(f, "{}", if n.is_sign_positive() { "inf" } else { "-inf" })
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    // Integer-valued doubles display without a decimal point
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Str(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
            Value::Pointer(p) => {
                if p.is_null {
                    write!(f, "null_ptr")
                } else {
                    write!(f, "ptr({})", p.type_tag)
                }
            }
            Value::List(l) => write!(f, "[list:{}]", l.len()),
            Value::Dict(d) => write!(f, "{{dict:{}}}", d.len()),
        }
    }
}
