use crate::{AsValue, DriverError, Value};

/// How a parameter is bound to a native statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Bool,
    Null,
    Int,
    String,
    /// Left to the backend, bound as text.
    Unspecified,
}

impl ParameterType {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ParameterType::Null,
            Value::Boolean(..) => ParameterType::Bool,
            Value::Int(..) => ParameterType::Int,
            Value::String(..) => ParameterType::String,
            Value::Float(..) | Value::Blob(..) => ParameterType::Unspecified,
        }
    }
}

/// Parameter in a normalized statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Set only for named parameters (`:name` placeholders of raw SQL).
    pub name: Option<String>,
    pub value: Value,
    pub ty: ParameterType,
}

impl Parameter {
    pub fn of(value: impl AsValue) -> Self {
        let value = value.as_value();
        Self {
            name: None,
            ty: ParameterType::of(&value),
            value,
        }
    }
    pub fn typed(value: impl AsValue, ty: ParameterType) -> Self {
        Self {
            name: None,
            value: value.as_value(),
            ty,
        }
    }
    pub fn named(name: impl Into<String>, value: impl AsValue) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::of(value)
        }
    }
    pub fn named_typed(name: impl Into<String>, value: impl AsValue, ty: ParameterType) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::typed(value, ty)
        }
    }

    /// Coerce the value to what gets handed to the native statement.
    ///
    /// A null value is always bound as null, whatever the declared type.
    pub fn bind_value(&self) -> Result<BindValue, DriverError> {
        if self.value.is_null() {
            return Ok(BindValue::Null);
        }
        Ok(match self.ty {
            ParameterType::Null => BindValue::Null,
            ParameterType::Bool => match self.value.as_bool() {
                Some(v) => BindValue::Bool(v),
                None => return Err(self.invalid_cast("boolean")),
            },
            ParameterType::Int => match self.value.as_i64() {
                Some(v) => BindValue::Int(v),
                None => return Err(self.invalid_cast("integer")),
            },
            ParameterType::String | ParameterType::Unspecified => {
                BindValue::Text(self.value.to_text().into_owned())
            }
        })
    }

    fn invalid_cast(&self, target: &str) -> DriverError {
        DriverError::new(
            DriverError::INVALID_CAST,
            None,
            format!("Cannot bind `{}` as {}", self.value, target),
        )
    }
}

impl<T: AsValue> From<T> for Parameter {
    fn from(value: T) -> Self {
        Parameter::of(value)
    }
}

/// Coerced parameter value, ready for a native bind call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(ParameterType::of(&Value::Null), ParameterType::Null);
        assert_eq!(ParameterType::of(&true.into()), ParameterType::Bool);
        assert_eq!(ParameterType::of(&42.into()), ParameterType::Int);
        assert_eq!(ParameterType::of(&"a".into()), ParameterType::String);
        assert_eq!(ParameterType::of(&1.5.into()), ParameterType::Unspecified);
    }

    #[test]
    fn bind_coercion() {
        assert_eq!(
            Parameter::typed("42", ParameterType::Int).bind_value(),
            Ok(BindValue::Int(42))
        );
        assert_eq!(
            Parameter::typed(7, ParameterType::String).bind_value(),
            Ok(BindValue::Text("7".into()))
        );
        assert_eq!(
            Parameter::typed(Value::Null, ParameterType::Int).bind_value(),
            Ok(BindValue::Null)
        );
        assert_eq!(
            Parameter::of(1.5).bind_value(),
            Ok(BindValue::Text("1.5".into()))
        );
        let error = Parameter::typed("abc", ParameterType::Int)
            .bind_value()
            .unwrap_err();
        assert_eq!(error.sqlstate, DriverError::INVALID_CAST);
    }
}
