use crate::{DomainError, Driver, Fragment, writer::Context};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// Name of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(Arc<str>);

impl TableName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainError> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(DomainError::EmptyName("table"));
        }
        Ok(Self(name.into()))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn aliased(&self, alias: impl AsRef<str>) -> Result<AliasedTableName, DomainError> {
        let alias = alias.as_ref();
        if alias.is_empty() {
            return Err(DomainError::EmptyName("table alias"));
        }
        Ok(AliasedTableName {
            name: self.clone(),
            alias: alias.into(),
        })
    }
    pub fn sql(&self, driver: Driver) -> String {
        driver.escape_identifier(&self.0)
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for TableName {
    type Error = DomainError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        TableName::new(value)
    }
}

/// A table bound to an alias, `"name" AS "alias"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasedTableName {
    pub name: TableName,
    pub alias: Arc<str>,
}

impl AliasedTableName {
    pub fn alias(&self) -> &str {
        &self.alias
    }
    pub fn sql(&self, driver: Driver) -> String {
        TableRef::from(self.clone()).sql(driver)
    }
}

/// Any table that can appear in a FROM, JOIN, INSERT INTO or DELETE FROM.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableRef {
    Name(TableName),
    Aliased(AliasedTableName),
}

impl TableRef {
    pub fn name(&self) -> &TableName {
        match self {
            TableRef::Name(name) => name,
            TableRef::Aliased(aliased) => &aliased.name,
        }
    }
    pub fn alias(&self) -> Option<&str> {
        match self {
            TableRef::Name(..) => None,
            TableRef::Aliased(aliased) => Some(&aliased.alias),
        }
    }
    /// The identifier other clauses use to refer to this table.
    pub fn reference(&self) -> &str {
        self.alias().unwrap_or(self.name().as_str())
    }
    /// Render as it appears in a FROM clause.
    pub fn sql(&self, driver: Driver) -> String {
        let mut out = String::new();
        let mut context = Context::new(Fragment::SqlSelectFrom);
        driver
            .sql_writer()
            .write_table_ref(&mut context, &mut out, self);
        out
    }
}

impl From<TableName> for TableRef {
    fn from(value: TableName) -> Self {
        TableRef::Name(value)
    }
}

impl From<&TableName> for TableRef {
    fn from(value: &TableName) -> Self {
        TableRef::Name(value.clone())
    }
}

impl From<AliasedTableName> for TableRef {
    fn from(value: AliasedTableName) -> Self {
        TableRef::Aliased(value)
    }
}
