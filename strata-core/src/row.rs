use crate::{AsValue, Parameter, ParameterType, Value};
use std::sync::Arc;

/// Column labels shared by every row of a result set.
pub type RowNames = Arc<[String]>;

/// Ordered mapping from column name to value.
///
/// Used as the payload of `Insert` and `Update`, and as the record produced by an executor. Values
/// may carry an explicit [`ParameterType`], overriding the classification of the value when bound.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Row {
    labels: RowNames,
    values: Box<[Value]>,
    types: Vec<Option<ParameterType>>,
}

impl Row {
    pub fn new(labels: RowNames, values: Box<[Value]>) -> Self {
        Self {
            labels,
            values,
            types: Vec::new(),
        }
    }

    pub fn of<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: AsValue,
    {
        pairs
            .into_iter()
            .fold(Row::default(), |row, (k, v)| row.with(k, v))
    }

    /// Set a column, replacing its value when already present.
    #[must_use]
    pub fn with(self, column: impl Into<String>, value: impl AsValue) -> Self {
        self.set(column.into(), value.as_value(), None)
    }

    /// Set a column bound with an explicit parameter type.
    #[must_use]
    pub fn with_typed(
        self,
        column: impl Into<String>,
        value: impl AsValue,
        ty: ParameterType,
    ) -> Self {
        self.set(column.into(), value.as_value(), Some(ty))
    }

    fn set(self, column: String, value: Value, ty: Option<ParameterType>) -> Self {
        let mut labels = self.labels.to_vec();
        let mut values = self.values.into_vec();
        let mut types = self.types;
        let index = match labels.iter().position(|v| *v == column) {
            Some(index) => {
                values[index] = value;
                index
            }
            None => {
                labels.push(column);
                values.push(value);
                labels.len() - 1
            }
        };
        if ty.is_some() || index < types.len() {
            types.resize(labels.len(), None);
            types[index] = ty;
        }
        Self {
            labels: labels.into(),
            values: values.into(),
            types,
        }
    }

    /// Value of a column, `None` when the row has no such column.
    pub fn column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn labels(&self) -> &RowNames {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
    /// Explicit type of the value at `index`, if any.
    pub fn parameter_type(&self, index: usize) -> Option<ParameterType> {
        self.types.get(index).copied().flatten()
    }
    /// Parameter binding the value at `index`.
    pub fn parameter(&self, index: usize) -> Parameter {
        let value = self.values.get(index).cloned().unwrap_or_default();
        match self.parameter_type(index) {
            Some(ty) => Parameter::typed(value, ty),
            None => Parameter::of(value),
        }
    }
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        (0..self.len()).map(|i| self.parameter(i))
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;
    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_in_order() {
        let row = Row::default().with("id", "u1").with("n", 42).with("id", "u2");
        assert_eq!(row.names(), ["id", "n"]);
        assert_eq!(row.column("id"), Some(&Value::String("u2".into())));
        assert_eq!(row.column("n"), Some(&Value::Int(42)));
        assert_eq!(row.column("missing"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn explicit_types_override_classification() {
        let row = Row::of([("a", "1")]).with_typed("b", "2", ParameterType::Int);
        assert_eq!(row.parameter(0).ty, ParameterType::String);
        assert_eq!(row.parameter(1).ty, ParameterType::Int);
        assert_eq!(row.parameter_type(0), None);
        let row = row.with("b", "3");
        assert_eq!(row.parameter(1).ty, ParameterType::String);
    }
}
