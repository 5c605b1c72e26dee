use crate::{Driver, Fragment, Parameter, Specification, writer::Context};

/// `WHERE` clause compiled from an optional specification.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Where(Option<Specification>);

impl Where {
    pub fn of(specification: Option<Specification>) -> Self {
        Self(specification)
    }
    /// Clause matching every row, renders as an empty string.
    pub fn everything() -> Self {
        Self(None)
    }
    pub fn specification(&self) -> Option<&Specification> {
        self.0.as_ref()
    }
    pub fn is_everything(&self) -> bool {
        self.0.is_none()
    }
    /// `WHERE <condition>`, or `""` when there is no specification.
    pub fn sql(&self, driver: Driver) -> String {
        let mut out = String::new();
        let mut context = Context::new(Fragment::SqlSelectWhere);
        driver.sql_writer().write_where(&mut context, &mut out, self);
        out
    }
    /// Parameters in placeholder order, the same for every driver.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.0
            .as_ref()
            .map(Specification::parameters)
            .unwrap_or_default()
    }
}

impl From<Specification> for Where {
    fn from(value: Specification) -> Self {
        Where::of(Some(value))
    }
}

impl From<Option<Specification>> for Where {
    fn from(value: Option<Specification>) -> Self {
        Where::of(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn everything_is_empty() {
        for driver in Driver::ALL {
            assert_eq!(Where::of(None).sql(driver), "");
            assert_eq!(Where::everything().sql(driver), "");
        }
        assert!(Where::everything().parameters().is_empty());
    }

    #[test]
    fn qualified_property() {
        let filter = Where::of(Some(Specification::equality("u.id", "x")));
        assert_eq!(filter.sql(Driver::MySql), "WHERE `u`.`id` = ?");
        assert_eq!(filter.sql(Driver::Sqlite), r#"WHERE "u"."id" = ?"#);
        assert_eq!(filter.sql(Driver::Postgres), r#"WHERE "u"."id" = $1"#);
        assert_eq!(filter.parameters()[0].value, Value::String("x".into()));
    }
}
