//! Runtime values and hash keys.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hasher;
use std::rc::Rc;

use fnv::FnvHasher;

use super::environment::Environment;
use crate::parser::ast::{BlockStatement, Identifier};

/// A runtime value.
///
/// `ReturnValue`, `Break`, `Continue`, `Void` and `Error` are control values:
/// they only exist to propagate across evaluation and are never user-visible
/// except as pretty-printed errors.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Void,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Str(String),
    Array(im::Vector<Value>),
    Hash(im::HashMap<HashKey, HashPair>),
    Function(Function),
    Builtin(Builtin),
    ReturnValue(Box<Value>),
    Break,
    Continue,
    Error(String),
}

/// Key derived from a hashable value: its type tag plus a 64-bit image
/// (the integer itself, 0/1 for booleans, FNV-1a 64 of string bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: &'static str,
    pub value: u64,
}

/// A stored hash entry; the original key value is kept for inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

/// A user function: parameters, body, and the environment captured when the
/// literal was evaluated (closure capture).
#[derive(Clone)]
pub struct Function {
    pub name: Option<Identifier>,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<RefCell<Environment>>,
}

impl fmt::Debug for Function {
    // The captured environment can be cyclic (recursive functions), so it is
    // left out of the debug form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// A host function from the built-ins table.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: fn(&[Value]) -> Value,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null)
            | (Value::Void, Value::Void)
            | (Value::Break, Value::Break)
            | (Value::Continue, Value::Continue) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a == b,
            (Value::ReturnValue(a), Value::ReturnValue(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl Value {
    /// The type tag, as printed by `type()` and used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Void => "VOID",
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Boolean(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Break => "BREAK",
            Value::Continue => "CONTINUE",
            Value::Error(_) => "ERROR",
        }
    }

    /// The canonical printable representation.
    pub fn inspect(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Void => "void".to_string(),
            Value::Integer(value) => value.to_string(),
            Value::Float(value) => format!("{:.6}", value),
            Value::Boolean(value) => value.to_string(),
            Value::Str(value) => value.clone(),
            Value::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(Value::inspect).collect();
                format!("[{}]", elements.join(", "))
            }
            Value::Hash(pairs) => {
                let pairs: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key.inspect(), pair.value.inspect()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
            Value::Function(function) => {
                let parameters: Vec<String> = function
                    .parameters
                    .iter()
                    .map(|parameter| parameter.value.clone())
                    .collect();
                match &function.name {
                    Some(name) => {
                        format!("fn {}({}) {}", name.value, parameters.join(", "), function.body)
                    }
                    None => format!("fn({}) {}", parameters.join(", "), function.body),
                }
            }
            Value::Builtin(_) => "builtin function".to_string(),
            Value::ReturnValue(value) => value.inspect(),
            Value::Break => "break".to_string(),
            Value::Continue => "continue".to_string(),
            Value::Error(message) => format!("ERROR: {}", message),
        }
    }

    /// Truthy is anything other than `null` and `false`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// The hash key of this value, for the hashable types only.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(value) => Some(HashKey {
                kind: self.type_name(),
                value: *value as u64,
            }),
            Value::Boolean(value) => Some(HashKey {
                kind: self.type_name(),
                value: u64::from(*value),
            }),
            Value::Str(value) => {
                let mut hasher = FnvHasher::default();
                hasher.write(value.as_bytes());
                Some(HashKey {
                    kind: self.type_name(),
                    value: hasher.finish(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}
