use crate::{Builder, Driver, Fragment, Join, Normalized, TableRef, Where, writer::Context};

/// `DELETE FROM table [JOIN ...] [WHERE ...]`.
///
/// With joins MySQL and SQLite repeat the target (`DELETE "t" FROM ...`), Postgres does not.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Delete {
    pub table: TableRef,
    pub joins: Vec<Join>,
    pub filter: Where,
}

impl Delete {
    pub fn from(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            joins: Vec::new(),
            filter: Where::everything(),
        }
    }
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }
    pub fn filter(mut self, filter: impl Into<Where>) -> Self {
        self.filter = filter.into();
        self
    }
}

impl Builder for Delete {
    fn normalize(&self, driver: Driver) -> Normalized {
        let mut context = Context::new(Fragment::None);
        let mut sql = String::with_capacity(64);
        driver.sql_writer().write_delete(&mut context, &mut sql, self);
        Normalized::from_context(sql, context, false)
    }
}
