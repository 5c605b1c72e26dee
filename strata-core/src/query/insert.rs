use crate::{Builder, Driver, Fragment, Normalized, Row, Select, TableName, writer::Context};

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Row(Row),
    Select(Box<Select>),
}

/// `INSERT` of one or more rows, or of the result of a `SELECT`.
///
/// Each source becomes its own statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Insert {
    pub table: TableName,
    pub sources: Vec<InsertSource>,
}

impl Insert {
    pub fn into(table: TableName, row: Row) -> Self {
        Self {
            table,
            sources: vec![InsertSource::Row(row)],
        }
    }
    /// `INSERT INTO table SELECT ...`.
    pub fn select(table: TableName, select: Select) -> Self {
        Self {
            table,
            sources: vec![InsertSource::Select(Box::new(select))],
        }
    }
    /// Insert a further row, with the same columns.
    pub fn and(mut self, row: Row) -> Self {
        self.sources.push(InsertSource::Row(row));
        self
    }
}

impl Builder for Insert {
    fn normalize(&self, driver: Driver) -> Normalized {
        Normalized::join(self.render(driver, true))
    }
    fn statements(&self, driver: Driver) -> Vec<Normalized> {
        self.render(driver, false)
    }
}

impl Insert {
    /// One statement per source, placeholders numbered across all of them when `continued`.
    fn render(&self, driver: Driver, continued: bool) -> Vec<Normalized> {
        let writer = driver.sql_writer();
        let mut offset = 0;
        self.sources
            .iter()
            .map(|source| {
                let mut context = Context::new(Fragment::None).with_offset(offset);
                let mut sql = String::with_capacity(64);
                match source {
                    InsertSource::Row(row) => {
                        writer.write_insert(&mut context, &mut sql, &self.table, row)
                    }
                    InsertSource::Select(select) => {
                        writer.write_insert_select(&mut context, &mut sql, &self.table, select)
                    }
                }
                if continued {
                    offset = context.placeholder();
                }
                Normalized::from_context(sql, context, false)
            })
            .collect()
    }
}
