use crate::{AsValue, Parameter, TypedValue, Value};

/// Relational or textual operator of a [`Comparator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Equality,
    Inequality,
    LessThan,
    MoreThan,
    LessThanOrEqual,
    MoreThanOrEqual,
    IsNull,
    IsNotNull,
    StartsWith,
    EndsWith,
    Contains,
    In,
}

impl Sign {
    /// Operator text as it appears in SQL.
    pub const fn operator(&self) -> &'static str {
        match self {
            Sign::Equality => "=",
            Sign::Inequality => "<>",
            Sign::LessThan => "<",
            Sign::MoreThan => ">",
            Sign::LessThanOrEqual => "<=",
            Sign::MoreThanOrEqual => ">=",
            Sign::IsNull => "IS NULL",
            Sign::IsNotNull => "IS NOT NULL",
            Sign::StartsWith | Sign::EndsWith | Sign::Contains => "LIKE",
            Sign::In => "IN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub const fn keyword(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }
}

/// Right hand side of a comparator.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparatorValue {
    None,
    Value(Value),
    Typed(TypedValue),
    List(Vec<Value>),
}

impl ComparatorValue {
    fn value(&self) -> Option<&Value> {
        match self {
            ComparatorValue::Value(v) => Some(v),
            ComparatorValue::Typed(v) => Some(&v.value),
            _ => None,
        }
    }
}

impl From<Value> for ComparatorValue {
    fn from(value: Value) -> Self {
        ComparatorValue::Value(value)
    }
}

impl From<TypedValue> for ComparatorValue {
    fn from(value: TypedValue) -> Self {
        ComparatorValue::Typed(value)
    }
}

impl From<Vec<Value>> for ComparatorValue {
    fn from(value: Vec<Value>) -> Self {
        ComparatorValue::List(value)
    }
}

/// Leaf predicate: `property sign value`.
///
/// The property is a column name, optionally qualified by a table or alias (`table.column`).
#[derive(Debug, Clone, PartialEq)]
pub struct Comparator {
    pub property: String,
    pub sign: Sign,
    pub value: ComparatorValue,
}

impl Comparator {
    pub fn new(property: impl Into<String>, sign: Sign, value: impl Into<ComparatorValue>) -> Self {
        Self {
            property: property.into(),
            sign,
            value: value.into(),
        }
    }

    /// Parameters bound by this comparator, in placeholder order.
    ///
    /// Null checks bind nothing, `In` binds one parameter per element, pattern signs bind the
    /// value wrapped in `%` wildcards.
    pub fn parameters(&self) -> Vec<Parameter> {
        let wrap = |prefix: &str, suffix: &str| -> Vec<Parameter> {
            let Some(value) = self.value.value() else {
                return Vec::new();
            };
            let pattern = Value::String(format!("{prefix}{}{suffix}", value.to_text()));
            match &self.value {
                ComparatorValue::Typed(typed) => vec![Parameter::typed(pattern, typed.ty)],
                _ => vec![Parameter::of(pattern)],
            }
        };
        match self.sign {
            Sign::IsNull | Sign::IsNotNull => Vec::new(),
            Sign::StartsWith => wrap("", "%"),
            Sign::EndsWith => wrap("%", ""),
            Sign::Contains => wrap("%", "%"),
            Sign::In => match &self.value {
                ComparatorValue::List(values) => values.iter().map(Parameter::of).collect(),
                ComparatorValue::None => Vec::new(),
                ComparatorValue::Value(v) => vec![Parameter::of(v)],
                ComparatorValue::Typed(v) => vec![Parameter::typed(&v.value, v.ty)],
            },
            _ => match &self.value {
                ComparatorValue::None => vec![Parameter::of(Value::Null)],
                ComparatorValue::Value(v) => vec![Parameter::of(v)],
                ComparatorValue::Typed(v) => vec![Parameter::typed(&v.value, v.ty)],
                ComparatorValue::List(values) => {
                    vec![Parameter::of(values.first().cloned().unwrap_or_default())]
                }
            },
        }
    }
}

/// Boolean predicate tree compiled into a `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Specification {
    Comparator(Comparator),
    Composite {
        left: Box<Specification>,
        right: Box<Specification>,
        operator: Operator,
    },
    Not(Box<Specification>),
}

macro_rules! comparator_constructors {
    ($($name:ident => $sign:expr),+ $(,)?) => {
        $(
            pub fn $name(property: impl Into<String>, value: impl AsValue) -> Self {
                Specification::Comparator(Comparator::new(property, $sign, value.as_value()))
            }
        )+
    };
}

impl Specification {
    comparator_constructors! {
        equality => Sign::Equality,
        inequality => Sign::Inequality,
        less_than => Sign::LessThan,
        more_than => Sign::MoreThan,
        less_than_or_equal => Sign::LessThanOrEqual,
        more_than_or_equal => Sign::MoreThanOrEqual,
        starts_with => Sign::StartsWith,
        ends_with => Sign::EndsWith,
        contains => Sign::Contains,
    }

    pub fn is_null(property: impl Into<String>) -> Self {
        Specification::Comparator(Comparator::new(property, Sign::IsNull, ComparatorValue::None))
    }
    pub fn is_not_null(property: impl Into<String>) -> Self {
        Specification::Comparator(Comparator::new(
            property,
            Sign::IsNotNull,
            ComparatorValue::None,
        ))
    }
    pub fn is_in<V: AsValue>(property: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Specification::Comparator(Comparator::new(
            property,
            Sign::In,
            values.into_iter().map(AsValue::as_value).collect::<Vec<_>>(),
        ))
    }
    /// Comparator whose value keeps its declared parameter type.
    pub fn typed(property: impl Into<String>, sign: Sign, value: TypedValue) -> Self {
        Specification::Comparator(Comparator::new(property, sign, value))
    }

    #[must_use]
    pub fn and(self, other: Specification) -> Self {
        self.composite(other, Operator::And)
    }
    #[must_use]
    pub fn or(self, other: Specification) -> Self {
        self.composite(other, Operator::Or)
    }
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Specification::Not(Box::new(self))
    }
    fn composite(self, right: Specification, operator: Operator) -> Self {
        Specification::Composite {
            left: Box::new(self),
            right: Box::new(right),
            operator,
        }
    }

    /// Parameters of the whole tree in placeholder order (pre-order, left before right).
    pub fn parameters(&self) -> Vec<Parameter> {
        let mut out = Vec::new();
        self.collect_parameters(&mut out);
        out
    }
    fn collect_parameters(&self, out: &mut Vec<Parameter>) {
        match self {
            Specification::Comparator(comparator) => out.extend(comparator.parameters()),
            Specification::Composite { left, right, .. } => {
                left.collect_parameters(out);
                right.collect_parameters(out);
            }
            Specification::Not(inner) => inner.collect_parameters(out),
        }
    }
}

impl From<Comparator> for Specification {
    fn from(value: Comparator) -> Self {
        Specification::Comparator(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnName, ParameterType};

    #[test]
    fn pattern_signs_wrap_the_bound_value() {
        let params = Specification::starts_with("name", "ab")
            .or(Specification::ends_with("name", "cd"))
            .and(Specification::contains("name", "ef"))
            .parameters();
        let values: Vec<_> = params.iter().map(|p| p.value.to_string()).collect();
        assert_eq!(values, ["ab%", "%cd", "%ef%"]);
    }

    #[test]
    fn in_binds_every_element() {
        let params = Specification::is_in("id", [3, 1, 2]).parameters();
        assert_eq!(
            params.iter().map(|p| p.value.clone()).collect::<Vec<_>>(),
            [Value::Int(3), Value::Int(1), Value::Int(2)]
        );
        assert!(Specification::is_null("id").parameters().is_empty());
    }

    #[test]
    fn typed_values_keep_their_type() {
        let column = ColumnName::new("n").unwrap();
        let spec = Specification::typed(
            "n",
            Sign::Equality,
            TypedValue::new(column, "42", ParameterType::Int),
        );
        let params = spec.not().parameters();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].ty, ParameterType::Int);
        assert_eq!(params[0].value, Value::String("42".into()));
    }
}
