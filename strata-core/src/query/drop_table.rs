use crate::{Builder, Driver, Fragment, Normalized, TableName, writer::Context};

#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct DropTable {
    pub table: TableName,
    pub if_exists: bool,
}

impl DropTable {
    pub fn named(table: TableName) -> Self {
        Self {
            table,
            if_exists: false,
        }
    }
    pub fn if_exists(table: TableName) -> Self {
        Self {
            table,
            if_exists: true,
        }
    }
}

impl Builder for DropTable {
    fn normalize(&self, driver: Driver) -> Normalized {
        let mut context = Context::new(Fragment::None);
        let mut sql = String::new();
        driver
            .sql_writer()
            .write_drop_table(&mut context, &mut sql, self);
        Normalized::from_context(sql, context, false)
    }
}
