use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

/// A dynamically typed value, as stored in a [`VariableMap`](crate::VariableMap).
///
/// Rust types move in and out of a `Value` via [`ValueType`](crate::prelude::ValueType).
/// Types without a natural variant may be stored with [`Value::custom`].
#[derive(Clone)]
pub enum Value {
    /// No value (ex: a bare flag).
    Empty,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A single character.
    Char(char),
    /// A string.
    Str(String),
    /// Any other type.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap an arbitrary type as a `Value::Custom`.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    /// Whether this is `Value::Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Borrow the inner type of a `Value::Custom`, if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// The name of this variant.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "str",
            Value::Custom(_) => "custom",
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Empty => write!(f, "Empty"),
            Value::Bool(inner) => write!(f, "Bool({inner:?})"),
            Value::Int(inner) => write!(f, "Int({inner:?})"),
            Value::UInt(inner) => write!(f, "UInt({inner:?})"),
            Value::Float(inner) => write!(f, "Float({inner:?})"),
            Value::Char(inner) => write!(f, "Char({inner:?})"),
            Value::Str(inner) => write!(f, "Str({inner:?})"),
            Value::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Bool(inner) => write!(f, "{inner}"),
            Value::Int(inner) => write!(f, "{inner}"),
            Value::UInt(inner) => write!(f, "{inner}"),
            Value::Float(inner) => write!(f, "{inner}"),
            Value::Char(inner) => write!(f, "{inner}"),
            Value::Str(inner) => write!(f, "{inner}"),
            Value::Custom(_) => write!(f, "<custom>"),
        }
    }
}

// Custom values are equal only when they share the same allocation.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Error for typed lookups against a [`VariableMap`](crate::VariableMap).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    /// The key has no values.
    #[error("no value stored for '{key}'.")]
    Missing {
        /// The looked up key.
        key: String,
    },
    /// The stored value cannot be read as the requested type.
    #[error("value stored for '{key}' is {actual}, which cannot be read as {expected}.")]
    Mismatch {
        /// The looked up key.
        key: String,
        /// The requested Rust type.
        expected: &'static str,
        /// The stored variant.
        actual: &'static str,
    },
}
