use crate::{Builder, Driver, Fragment, Normalized, Row, TableName, Where, writer::Context};

/// `UPDATE table SET ... [WHERE ...]`.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Update {
    pub table: TableName,
    pub row: Row,
    pub filter: Where,
}

impl Update {
    pub fn set(table: TableName, row: Row) -> Self {
        Self {
            table,
            row,
            filter: Where::everything(),
        }
    }
    pub fn filter(mut self, filter: impl Into<Where>) -> Self {
        self.filter = filter.into();
        self
    }
}

impl Builder for Update {
    fn normalize(&self, driver: Driver) -> Normalized {
        let mut context = Context::new(Fragment::None);
        let mut sql = String::with_capacity(64);
        driver.sql_writer().write_update(&mut context, &mut sql, self);
        Normalized::from_context(sql, context, false)
    }
}
