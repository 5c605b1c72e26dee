use crate::{SqlWriter, writer::Context};

/// SQLite dialect.
///
/// Column comments are dropped, SQLite has nowhere to store them.
#[derive(Default, Debug, Clone, Copy)]
pub struct SqliteWriter {}

impl SqliteWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for SqliteWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push(if value { '1' } else { '0' });
    }
}
