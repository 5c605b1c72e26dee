use crate::{ColumnName, ParameterType};
use std::{
    borrow::Cow,
    fmt::{self, Display},
};

/// Scalar carried by rows and parameters.
///
/// Builders only ever produce `Null`, `Boolean`, `Int` and `String`. `Float` and `Blob` appear when
/// a backend decodes such columns natively.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
    /// Integer view of the value, numeric strings included.
    ///
    /// Some backends return integer columns in their textual form.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Boolean(v) => Some(*v as i64),
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Value::String(v) => v.trim().parse().ok(),
            _ => None,
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            Value::Int(v) => Some(*v != 0),
            Value::String(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "t" | "true" | "y" | "yes" | "on" => Some(true),
                "0" | "f" | "false" | "n" | "no" | "off" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
    /// Textual form used when binding as a string.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Boolean(v) => Cow::Borrowed(if *v { "1" } else { "0" }),
            Value::Int(v) => Cow::Owned(v.to_string()),
            Value::Float(v) => Cow::Owned(v.to_string()),
            Value::String(v) => Cow::Borrowed(v),
            Value::Blob(v) => String::from_utf8_lossy(v),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            _ => f.write_str(&self.to_text()),
        }
    }
}

/// Conversion of Rust values into a [`Value`].
pub trait AsValue {
    fn as_value(self) -> Value;
}

impl AsValue for Value {
    fn as_value(self) -> Value {
        self
    }
}

impl AsValue for &Value {
    fn as_value(self) -> Value {
        self.clone()
    }
}

impl AsValue for bool {
    fn as_value(self) -> Value {
        Value::Boolean(self)
    }
}

macro_rules! impl_as_value_integer {
    ($($ty:ty),+) => {
        $(
            impl AsValue for $ty {
                fn as_value(self) -> Value {
                    Value::Int(self as i64)
                }
            }
        )+
    };
}
impl_as_value_integer!(i8, i16, i32, i64, u8, u16, u32);

impl AsValue for f32 {
    fn as_value(self) -> Value {
        Value::Float(self as f64)
    }
}

impl AsValue for f64 {
    fn as_value(self) -> Value {
        Value::Float(self)
    }
}

impl AsValue for &str {
    fn as_value(self) -> Value {
        Value::String(self.into())
    }
}

impl AsValue for String {
    fn as_value(self) -> Value {
        Value::String(self)
    }
}

impl AsValue for &String {
    fn as_value(self) -> Value {
        Value::String(self.clone())
    }
}

impl AsValue for Vec<u8> {
    fn as_value(self) -> Value {
        Value::Blob(self)
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
}

macro_rules! impl_from_as_value {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    value.as_value()
                }
            }
        )+
    };
}
impl_from_as_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    &str,
    String,
    Vec<u8>
);

/// A value with an explicit column and parameter type.
///
/// Projected as `? AS "column"` by `Select`, or used as a comparator value whose declared type
/// must not be inferred again.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub column: ColumnName,
    pub value: Value,
    pub ty: ParameterType,
}

impl TypedValue {
    pub fn new(column: ColumnName, value: impl AsValue, ty: ParameterType) -> Self {
        Self {
            column,
            value: value.as_value(),
            ty,
        }
    }
    /// Typed with the type classified from the value.
    pub fn of(column: ColumnName, value: impl AsValue) -> Self {
        let value = value.as_value();
        let ty = ParameterType::of(&value);
        Self { column, value, ty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from("u1"), Value::String("u1".into()));
        assert_eq!(Option::<i32>::None.as_value(), Value::Null);
        assert_eq!(Some(true).as_value(), Value::Boolean(true));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::String(" 42".into()).as_i64(), Some(42));
        assert_eq!(Value::Int(42).as_i64(), Some(42));
        assert_eq!(Value::String("abc".into()).as_i64(), None);
        assert_eq!(Value::String("t".into()).as_bool(), Some(true));
        assert_eq!(Value::Int(0).as_bool(), Some(false));
        assert_eq!(Value::Boolean(true).to_text(), "1");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
