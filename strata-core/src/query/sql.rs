use crate::{Builder, Driver, Normalized, Parameter};

/// Literal SQL text with its parameters.
///
/// Placeholders are written by the caller in the syntax of the target backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Sql {
    pub text: String,
    pub parameters: Vec<Parameter>,
    pub lazy: bool,
}

impl Sql {
    /// Buffered statement.
    pub fn of(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: Vec::new(),
            lazy: false,
        }
    }
    /// Statement whose rows are fetched on demand.
    pub fn lazily(text: impl Into<String>) -> Self {
        Self {
            lazy: true,
            ..Self::of(text)
        }
    }
    #[must_use]
    pub fn with(mut self, parameter: impl Into<Parameter>) -> Self {
        self.parameters.push(parameter.into());
        self
    }
}

impl Builder for Sql {
    fn normalize(&self, _driver: Driver) -> Normalized {
        Normalized {
            sql: self.text.clone(),
            parameters: self.parameters.clone(),
            lazy: self.lazy,
        }
    }
}

impl From<&str> for Sql {
    fn from(value: &str) -> Self {
        Sql::of(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParameterType;

    #[test]
    fn parameters_are_kept_in_order() {
        let sql = Sql::lazily("SELECT * FROM t WHERE a = :a AND b = ?")
            .with(Parameter::named("a", 1))
            .with("x");
        let normalized = sql.normalize(Driver::Sqlite);
        assert!(normalized.lazy);
        assert_eq!(normalized.parameters.len(), 2);
        assert_eq!(normalized.parameters[0].name.as_deref(), Some("a"));
        assert_eq!(normalized.parameters[1].ty, ParameterType::String);
        assert!(!Sql::of("SELECT 1").normalize(Driver::MySql).lazy);
    }
}
