//! Runtime values.

use std::fmt;
use std::io::prelude::*;
use std::rc::Rc;

use crate::ast::{Block, Ident};
use crate::env::Env;

/// Host-implemented callable exposed to the language.
///
/// The first argument is the evaluator's output sink, used by the printing
/// predefs; most predefs ignore it.
pub type BuiltinFn = fn(&mut dyn Write, &[Value]) -> Value;

/// Entry in the predefined-function registry.
#[derive(Clone, Copy)]
pub struct Predef {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Predef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predef").field("name", &self.name).finish()
    }
}

/// A user-defined function: parameters, body, and the environment captured
/// at the point the literal was evaluated.
#[derive(Debug)]
pub struct Function {
    pub parameters: Vec<Ident>,
    pub body: Block,
    pub env: Rc<Env>,
}

/// A value produced by evaluation.
///
/// `Return` and `Error` are transient markers: they ride through statement
/// evaluation to implement early exit and are unwrapped (or surfaced) at the
/// program and call boundaries.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Null,
    /// Strings are raw byte buffers; slicing and indexing are byte-exact,
    /// and UTF-8 decoding happens lossily at display time only.
    Str(Rc<Vec<u8>>),
    Array(Rc<Vec<Value>>),
    Function(Rc<Function>),
    Predef(Predef),
    Return(Box<Value>),
    Error(String),
}

pub const INTEGER_TAG: &str = "INTEGER";
pub const BOOLEAN_TAG: &str = "BOOLEAN";
pub const STRING_TAG: &str = "STRING";
pub const NULL_TAG: &str = "NULL";
pub const ARRAY_TAG: &str = "ARRAY";
pub const FUNCTION_TAG: &str = "FUNCTION";
pub const PREDEF_TAG: &str = "PREDEFINED_FUNCTION";
pub const RETURN_VALUE_TAG: &str = "RETURN_VALUE";
pub const ERROR_TAG: &str = "ERROR";

impl Value {
    pub fn string(s: impl Into<Vec<u8>>) -> Value {
        Value::Str(Rc::new(s.into()))
    }

    /// The value's type tag, as spelled in error messages.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Int(_) => INTEGER_TAG,
            Value::Bool(_) => BOOLEAN_TAG,
            Value::Str(_) => STRING_TAG,
            Value::Null => NULL_TAG,
            Value::Array(_) => ARRAY_TAG,
            Value::Function(_) => FUNCTION_TAG,
            Value::Predef(_) => PREDEF_TAG,
            Value::Return(_) => RETURN_VALUE_TAG,
            Value::Error(_) => ERROR_TAG,
        }
    }

    /// Debug rendering: what the interactive loop echoes.
    pub fn inspect(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Null => "null".to_string(),
            Value::Str(s) => format!("\"{}\"", String::from_utf8_lossy(s)),
            Value::Array(elements) => {
                let inner = elements
                    .iter()
                    .map(|e| e.inspect())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", inner)
            }
            Value::Function(func) => {
                let params = func
                    .parameters
                    .iter()
                    .map(|p| p.name.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("fn({}) {{\n{}\n}}", params, func.body)
            }
            Value::Predef(_) => "predefined function".to_string(),
            Value::Return(inner) => inner.inspect(),
            Value::Error(message) => format!("ERROR: {}", message),
        }
    }

    /// User-facing rendering: what `print` writes.
    pub fn printable(&self) -> String {
        match self {
            Value::Str(s) => String::from_utf8_lossy(s).into_owned(),
            Value::Array(elements) => {
                let inner = elements
                    .iter()
                    .map(|e| e.printable())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", inner)
            }
            Value::Return(_) => "RV".to_string(),
            Value::Error(message) => format!("error: {}", message),
            other => other.inspect(),
        }
    }

    /// Everything is truthy except `false` and `null`; in particular 0 and
    /// the empty string are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false) | Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// The generic equality behind `==`/`!=` for non-integer operands.
    ///
    /// Booleans and null compare by their canonical identity; strings,
    /// arrays and functions compare by reference, so two separately built
    /// strings with the same content are NOT equal.
    pub fn ref_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Predef(a), Value::Predef(b)) => a.name == b.name,
            _ => false,
        }
    }
}

// Structural comparison for tests; the evaluator's `==` goes through
// `ref_eq` instead.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Predef(a), Value::Predef(b)) => a.name == b.name,
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.printable())
    }
}
