use crate::{SqlWriter, writer::Context};

/// MySQL and MariaDB dialect.
#[derive(Default, Debug, Clone, Copy)]
pub struct MySqlWriter {}

impl MySqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for MySqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(context, out, value, '`', "``");
        out.push('`');
    }

    fn write_column_comment_inline(&self, context: &mut Context, out: &mut String, comment: &str) {
        out.push_str(" COMMENT ");
        self.write_value_string(context, out, comment);
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("START TRANSACTION");
    }
}
