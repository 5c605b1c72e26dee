use crate::{ColumnType, DomainError, Driver, TableRef, writer::Context};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// Name of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName(Arc<str>);

impl ColumnName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainError> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(DomainError::EmptyName("column"));
        }
        Ok(Self(name.into()))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Qualify the column with a table, or with its alias when the table is aliased.
    pub fn in_table(&self, table: impl Into<TableRef>) -> NamespacedColumnName {
        NamespacedColumnName {
            namespace: table.into().reference().into(),
            column: self.clone(),
        }
    }
    /// Qualify the column with a bare alias.
    pub fn in_alias(&self, alias: impl AsRef<str>) -> Result<NamespacedColumnName, DomainError> {
        let alias = alias.as_ref();
        if alias.is_empty() {
            return Err(DomainError::EmptyName("table alias"));
        }
        Ok(NamespacedColumnName {
            namespace: alias.into(),
            column: self.clone(),
        })
    }
    pub fn aliased(&self, alias: impl AsRef<str>) -> Result<AliasedColumnName, DomainError> {
        AliasedColumnName::new(self.clone(), alias)
    }
    pub fn sql(&self, driver: Driver) -> String {
        ColumnRef::from(self).sql(driver)
    }
}

impl Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ColumnName {
    type Error = DomainError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ColumnName::new(value)
    }
}

/// Column qualified by its table, `"table"."column"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedColumnName {
    pub namespace: Arc<str>,
    pub column: ColumnName,
}

impl NamespacedColumnName {
    pub fn aliased(&self, alias: impl AsRef<str>) -> Result<AliasedColumnName, DomainError> {
        AliasedColumnName::new(self.clone(), alias)
    }
    pub fn sql(&self, driver: Driver) -> String {
        ColumnRef::from(self.clone()).sql(driver)
    }
}

/// Projected column renamed in the result set, `<column> AS "alias"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasedColumnName {
    pub column: Box<ColumnRef>,
    pub alias: Arc<str>,
}

impl AliasedColumnName {
    fn new(column: impl Into<ColumnRef>, alias: impl AsRef<str>) -> Result<Self, DomainError> {
        let alias = alias.as_ref();
        if alias.is_empty() {
            return Err(DomainError::EmptyName("column alias"));
        }
        Ok(Self {
            column: Box::new(column.into()),
            alias: alias.into(),
        })
    }
    pub fn sql(&self, driver: Driver) -> String {
        ColumnRef::from(self.clone()).sql(driver)
    }
}

/// Any column reference accepted by the builders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    Name(ColumnName),
    Namespaced(NamespacedColumnName),
    Aliased(AliasedColumnName),
}

impl ColumnRef {
    pub fn name(&self) -> &ColumnName {
        match self {
            ColumnRef::Name(name) => name,
            ColumnRef::Namespaced(namespaced) => &namespaced.column,
            ColumnRef::Aliased(aliased) => aliased.column.name(),
        }
    }
    pub fn sql(&self, driver: Driver) -> String {
        let mut out = String::new();
        let mut context = Context::default();
        driver
            .sql_writer()
            .write_column_ref(&mut context, &mut out, self);
        out
    }
}

impl From<ColumnName> for ColumnRef {
    fn from(value: ColumnName) -> Self {
        ColumnRef::Name(value)
    }
}

impl From<&ColumnName> for ColumnRef {
    fn from(value: &ColumnName) -> Self {
        ColumnRef::Name(value.clone())
    }
}

impl From<NamespacedColumnName> for ColumnRef {
    fn from(value: NamespacedColumnName) -> Self {
        ColumnRef::Namespaced(value)
    }
}

impl From<AliasedColumnName> for ColumnRef {
    fn from(value: AliasedColumnName) -> Self {
        ColumnRef::Aliased(value)
    }
}

/// Column definition used by `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: ColumnName,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: ColumnName, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableName;

    #[test]
    fn column_sql() {
        let id = ColumnName::new("id").unwrap();
        let users = TableName::new("users").unwrap();
        assert_eq!(id.sql(Driver::MySql), "`id`");
        assert_eq!(id.in_table(&users).sql(Driver::MySql), "`users`.`id`");
        assert_eq!(
            id.in_table(users.aliased("u").unwrap()).sql(Driver::Postgres),
            r#""u"."id""#
        );
        assert_eq!(
            id.in_table(&users)
                .aliased("user_id")
                .unwrap()
                .sql(Driver::Sqlite),
            r#""users"."id" AS "user_id""#
        );
    }
}
