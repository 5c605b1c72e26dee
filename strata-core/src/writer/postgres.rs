use crate::{Column, ColumnType, SqlWriter, TableName, TypeKind, writer::Context};
use std::fmt::Write;

/// PostgreSQL dialect.
#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresWriter {}

impl PostgresWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for PostgresWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut String) {
        let _ = write!(out, "${}", context.placeholder());
    }

    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("'\\x");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    fn write_column_type(&self, _context: &mut Context, out: &mut String, value: &ColumnType) {
        match &value.kind {
            TypeKind::BigInt(..) => out.push_str("BIGINT"),
            TypeKind::Binary(..) | TypeKind::Blob => out.push_str("BYTEA"),
            TypeKind::Bit(Some(size)) => {
                let _ = write!(out, "BIT({})", size);
            }
            TypeKind::Bit(None) => out.push_str("BIT"),
            TypeKind::Char(length) => {
                let _ = write!(out, "CHAR({})", length);
            }
            TypeKind::Date => out.push_str("DATE"),
            TypeKind::Datetime => out.push_str("TIMESTAMP"),
            TypeKind::Decimal { precision, scale } => {
                let _ = write!(out, "NUMERIC({},{})", precision, scale);
            }
            TypeKind::Double => out.push_str("DOUBLE PRECISION"),
            TypeKind::Float => out.push_str("REAL"),
            TypeKind::Int(..) | TypeKind::MediumInt(..) => out.push_str("INTEGER"),
            TypeKind::Json => out.push_str("JSON"),
            TypeKind::LongText | TypeKind::MediumText | TypeKind::Text => out.push_str("TEXT"),
            TypeKind::SmallInt(..) | TypeKind::TinyInt(..) => out.push_str("SMALLINT"),
            TypeKind::Varchar(length) => {
                let _ = write!(out, "VARCHAR({})", length);
            }
        }
    }

    fn write_column_comment_statement(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableName,
        column: &Column,
    ) {
        let Some(comment) = &column.column_type.comment else {
            return;
        };
        out.push_str("COMMENT ON COLUMN ");
        self.write_table_name(context, out, table);
        out.push('.');
        self.write_identifier_quoted(context, out, column.name.as_str());
        out.push_str(" IS ");
        self.write_value_string(context, out, comment);
    }

    fn write_delete_target(
        &self,
        _context: &mut Context,
        _out: &mut String,
        _table: &crate::TableRef,
    ) {
    }
}
