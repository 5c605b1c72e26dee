use crate::{Builder, ColumnName, Driver, Fragment, Normalized, Row, TableName, writer::Context};

/// Single multi-row `INSERT INTO table (columns) VALUES (...), (...)`.
///
/// Row values are bound positionally against the column list, their names are not looked at. A
/// row with the wrong number of values makes the statement fail when executed.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct MultipleInsert {
    pub table: TableName,
    pub columns: Vec<ColumnName>,
    pub rows: Vec<Row>,
}

impl MultipleInsert {
    pub fn into(table: TableName, columns: impl IntoIterator<Item = ColumnName>) -> Self {
        Self {
            table,
            columns: columns.into_iter().collect(),
            rows: Vec::new(),
        }
    }
    pub fn add(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Builder for MultipleInsert {
    fn normalize(&self, driver: Driver) -> Normalized {
        let mut context = Context::new(Fragment::None);
        let mut sql = String::with_capacity(64 + self.rows.len() * 16);
        driver
            .sql_writer()
            .write_multiple_insert(&mut context, &mut sql, self);
        Normalized::from_context(sql, context, false)
    }
}
