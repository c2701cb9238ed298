//! Traits which, typically, may be imported without concern: `use cmdopts::prelude::*`.
use std::path::PathBuf;

use crate::model::Value;

/// Behaviour to move a Rust type into and out of a [`Value`].
// Needs to be imported in order to implement a custom `ValueType`.
pub trait ValueType: Sized {
    /// Store this as a `Value`.
    fn into_value(self) -> Value;

    /// Read this back from a `Value`, or `None` if the variant does not fit.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! signed_value_type {
    ($($t:ty),*) => {
        $(
            impl ValueType for $t {
                fn into_value(self) -> Value {
                    Value::Int(self as i64)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(inner) => <$t>::try_from(*inner).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

macro_rules! unsigned_value_type {
    ($($t:ty),*) => {
        $(
            impl ValueType for $t {
                fn into_value(self) -> Value {
                    Value::UInt(self as u64)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::UInt(inner) => <$t>::try_from(*inner).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

signed_value_type!(i8, i16, i32, i64, isize);
unsigned_value_type!(u8, u16, u32, u64, usize);

impl ValueType for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(inner) => Some(*inner),
            _ => None,
        }
    }
}

impl ValueType for f32 {
    fn into_value(self) -> Value {
        Value::Float(self as f64)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(inner) => Some(*inner as f32),
            _ => None,
        }
    }
}

impl ValueType for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(inner) => Some(*inner),
            _ => None,
        }
    }
}

impl ValueType for char {
    fn into_value(self) -> Value {
        Value::Char(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(inner) => Some(*inner),
            _ => None,
        }
    }
}

impl ValueType for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(inner) => Some(inner.clone()),
            _ => None,
        }
    }
}

impl ValueType for PathBuf {
    fn into_value(self) -> Value {
        Value::Str(self.to_string_lossy().into_owned())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(inner) => Some(PathBuf::from(inner)),
            _ => None,
        }
    }
}

impl ValueType for () {
    fn into_value(self) -> Value {
        Value::Empty
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Empty => Some(()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Int(-1), Some(-1))]
    #[case(Value::Int(127), Some(127))]
    #[case(Value::Int(128), None)]
    #[case(Value::UInt(1), None)]
    #[case(Value::Str("1".to_string()), None)]
    fn signed_from_value(#[case] value: Value, #[case] expected: Option<i8>) {
        assert_eq!(i8::from_value(&value), expected);
    }

    #[rstest]
    #[case(Value::UInt(3), Some(3))]
    #[case(Value::UInt(u64::MAX), None)]
    #[case(Value::Int(3), None)]
    fn unsigned_from_value(#[case] value: Value, #[case] expected: Option<u32>) {
        assert_eq!(u32::from_value(&value), expected);
    }

    #[test]
    fn into_value() {
        assert_eq!(5u16.into_value(), Value::UInt(5));
        assert_eq!((-5isize).into_value(), Value::Int(-5));
        assert_eq!(true.into_value(), Value::Bool(true));
        assert_eq!('c'.into_value(), Value::Char('c'));
        assert_eq!(0.5f32.into_value(), Value::Float(0.5));
        assert_eq!("abc".to_string().into_value(), Value::Str("abc".to_string()));
        assert_eq!(().into_value(), Value::Empty);
    }

    #[test]
    fn path_buf() {
        let value = PathBuf::from("/tmp/file.txt").into_value();
        assert_eq!(value, Value::Str("/tmp/file.txt".to_string()));
        assert_eq!(
            PathBuf::from_value(&value),
            Some(PathBuf::from("/tmp/file.txt"))
        );
    }
}
