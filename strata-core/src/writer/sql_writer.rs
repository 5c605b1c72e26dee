use crate::{
    Column, ColumnName, ColumnRef, ColumnType, Comparator, Constraint, CreateTable, Delete,
    Direction, DropTable, Fragment, Join, MultipleInsert, OnDelete, Parameter, Projected,
    Projection, Row, Select, Sign, Specification, TableName, TableRef, TypeKind, Update, Value,
    Where, separated_by, writer::Context,
};
use std::fmt::Write;

/// Dialect printer converting the query model into concrete SQL strings.
///
/// Every method has a default rendering, dialects override the parts where they differ.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Whether the current fragment declares table aliases (`"t" AS "a"`) or only references them.
    fn alias_declaration(&self, context: &Context) -> bool {
        matches!(
            context.fragment,
            Fragment::SqlSelectFrom | Fragment::SqlJoin | Fragment::SqlDeleteFrom
        )
    }

    /// Whether the current fragment declares column aliases (`"c" AS "a"`).
    fn column_alias_declaration(&self, context: &Context) -> bool {
        matches!(context.fragment, Fragment::None | Fragment::SqlSelect)
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    /// Render a table, declaring its alias where the fragment allows it.
    fn write_table_ref(&self, context: &mut Context, out: &mut String, value: &TableRef) {
        match value {
            TableRef::Name(name) => self.write_identifier_quoted(context, out, name.as_str()),
            TableRef::Aliased(aliased) => {
                if self.alias_declaration(context) {
                    self.write_identifier_quoted(context, out, aliased.name.as_str());
                    out.push_str(" AS ");
                }
                self.write_identifier_quoted(context, out, aliased.alias());
            }
        }
    }

    fn write_table_name(&self, context: &mut Context, out: &mut String, value: &TableName) {
        self.write_identifier_quoted(context, out, value.as_str());
    }

    /// Render a column reference.
    fn write_column_ref(&self, context: &mut Context, out: &mut String, value: &ColumnRef) {
        match value {
            ColumnRef::Name(name) => self.write_identifier_quoted(context, out, name.as_str()),
            ColumnRef::Namespaced(namespaced) => {
                self.write_identifier_quoted(context, out, &namespaced.namespace);
                out.push('.');
                self.write_identifier_quoted(context, out, namespaced.column.as_str());
            }
            ColumnRef::Aliased(aliased) => {
                if self.column_alias_declaration(context) {
                    self.write_column_ref(context, out, &aliased.column);
                    out.push_str(" AS ");
                }
                self.write_identifier_quoted(context, out, &aliased.alias);
            }
        }
    }

    /// Render a specification property, `table.column` is qualified.
    fn write_property(&self, context: &mut Context, out: &mut String, value: &str) {
        match value.split_once('.') {
            Some((table, column)) => {
                self.write_identifier_quoted(context, out, table);
                out.push('.');
                self.write_identifier_quoted(context, out, column);
            }
            None => self.write_identifier_quoted(context, out, value),
        }
    }

    /// Placeholder of the last parameter pushed into the context.
    fn write_placeholder(&self, _context: &mut Context, out: &mut String) {
        out.push('?');
    }

    fn write_parameter(&self, context: &mut Context, out: &mut String, value: Parameter) {
        context.push_parameter(value);
        self.write_placeholder(context, out);
    }

    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push_str(if value { "true" } else { "false" });
    }

    fn write_value_string(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(context, out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    /// Render a literal value, only used where the statement cannot be parameterized.
    fn write_value(&self, context: &mut Context, out: &mut String, value: &Value) {
        match value {
            Value::Null => self.write_value_none(context, out),
            Value::Boolean(v) => self.write_value_bool(context, out, *v),
            Value::Int(v) => {
                let _ = write!(out, "{}", v);
            }
            Value::Float(v) => {
                let _ = write!(out, "{:?}", v);
            }
            Value::String(v) => self.write_value_string(context, out, v),
            Value::Blob(v) => self.write_value_blob(context, out, v),
        }
    }

    /// Render a comparator and push its parameters.
    fn write_comparator(&self, context: &mut Context, out: &mut String, value: &Comparator) {
        self.write_property(context, out, &value.property);
        out.push(' ');
        out.push_str(value.sign.operator());
        match value.sign {
            Sign::IsNull | Sign::IsNotNull => {}
            Sign::In => {
                out.push_str(" (");
                separated_by(
                    out,
                    value.parameters(),
                    |out, v| self.write_parameter(context, out, v),
                    ", ",
                );
                out.push(')');
            }
            _ => {
                for parameter in value.parameters() {
                    out.push(' ');
                    self.write_parameter(context, out, parameter);
                }
            }
        }
    }

    /// Render a specification tree, composites are always parenthesized.
    fn write_specification(&self, context: &mut Context, out: &mut String, value: &Specification) {
        match value {
            Specification::Comparator(comparator) => {
                self.write_comparator(context, out, comparator)
            }
            Specification::Composite {
                left,
                right,
                operator,
            } => {
                out.push('(');
                self.write_specification(context, out, left);
                out.push(' ');
                out.push_str(operator.keyword());
                out.push(' ');
                self.write_specification(context, out, right);
                out.push(')');
            }
            Specification::Not(inner) => {
                out.push_str("NOT(");
                self.write_specification(context, out, inner);
                out.push(')');
            }
        }
    }

    /// Render `WHERE <specification>`, nothing when the clause matches everything.
    fn write_where(&self, context: &mut Context, out: &mut String, value: &Where) {
        if let Some(specification) = value.specification() {
            out.push_str("WHERE ");
            self.write_specification(context, out, specification);
        }
    }

    /// Render a JOIN clause.
    fn write_join(&self, context: &mut Context, out: &mut String, join: &Join) {
        let mut context = context.switch_fragment(Fragment::SqlJoin);
        out.push_str("LEFT JOIN ");
        self.write_table_ref(&mut context, out, &join.table);
        if let Some((left, right)) = &join.on {
            out.push_str(" ON ");
            self.write_column_ref(&mut context, out, left);
            out.push_str(" = ");
            self.write_column_ref(&mut context, out, right);
        }
    }

    /// Render the projection list of a SELECT.
    fn write_projection(&self, context: &mut Context, out: &mut String, value: &Projection) {
        match value {
            Projection::Columns(columns) if columns.is_empty() => out.push('*'),
            Projection::Columns(columns) => separated_by(
                out,
                columns,
                |out, v| match v {
                    Projected::Column(column) => self.write_column_ref(context, out, column),
                    Projected::Value(value) => {
                        self.write_parameter(
                            context,
                            out,
                            Parameter::typed(&value.value, value.ty),
                        );
                        out.push_str(" AS ");
                        self.write_identifier_quoted(context, out, value.column.as_str());
                    }
                },
                ", ",
            ),
            Projection::Count(alias) => {
                out.push_str("COUNT(1) AS ");
                self.write_identifier_quoted(context, out, alias.as_str());
            }
        }
    }

    /// Emit SELECT statement (projection, FROM, JOIN, WHERE, ORDER, LIMIT).
    fn write_select(&self, context: &mut Context, out: &mut String, select: &Select) {
        out.push_str("SELECT ");
        {
            let mut context = context.switch_fragment(Fragment::SqlSelect);
            self.write_projection(&mut context, out, &select.projection);
        }
        out.push_str(" FROM ");
        self.write_table_ref(
            &mut context.switch_fragment(Fragment::SqlSelectFrom),
            out,
            &select.table,
        );
        for join in &select.joins {
            out.push(' ');
            self.write_join(context, out, join);
        }
        if !select.filter.is_everything() {
            out.push(' ');
            self.write_where(
                &mut context.switch_fragment(Fragment::SqlSelectWhere),
                out,
                &select.filter,
            );
        }
        if let Some((column, direction)) = &select.order {
            out.push_str(" ORDER BY ");
            self.write_column_ref(
                &mut context.switch_fragment(Fragment::SqlSelectOrderBy),
                out,
                column,
            );
            out.push_str(match direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            });
        }
        if let Some(limit) = select.limit {
            let _ = write!(out, " LIMIT {}", limit);
            if let Some(offset) = select.offset {
                let _ = write!(out, " OFFSET {}", offset);
            }
        }
    }

    /// Emit single row INSERT.
    fn write_insert(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableName,
        row: &Row,
    ) {
        let mut context = context.switch_fragment(Fragment::SqlInsertInto);
        out.push_str("INSERT INTO ");
        self.write_table_name(&mut context, out, table);
        out.push_str(" (");
        separated_by(
            out,
            row.names(),
            |out, v| self.write_identifier_quoted(&mut context, out, v),
            ", ",
        );
        out.push_str(") VALUES (");
        let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
        separated_by(
            out,
            row.parameters(),
            |out, v| self.write_parameter(&mut context, out, v),
            ", ",
        );
        out.push(')');
    }

    /// Emit `INSERT INTO ... SELECT ...`.
    fn write_insert_select(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &TableName,
        select: &Select,
    ) {
        out.push_str("INSERT INTO ");
        self.write_table_name(
            &mut context.switch_fragment(Fragment::SqlInsertInto),
            out,
            table,
        );
        out.push(' ');
        self.write_select(context, out, select);
    }

    /// Emit multi-row INSERT, values bound positionally against the column list.
    fn write_multiple_insert(&self, context: &mut Context, out: &mut String, value: &MultipleInsert) {
        let mut context = context.switch_fragment(Fragment::SqlInsertInto);
        out.push_str("INSERT INTO ");
        self.write_table_name(&mut context, out, &value.table);
        out.push_str(" (");
        separated_by(
            out,
            &value.columns,
            |out, v| self.write_identifier_quoted(&mut context, out, v.as_str()),
            ", ",
        );
        out.push_str(") VALUES ");
        let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
        separated_by(
            out,
            &value.rows,
            |out, row| {
                out.push('(');
                separated_by(
                    out,
                    row.parameters(),
                    |out, v| self.write_parameter(&mut context, out, v),
                    ", ",
                );
                out.push(')');
            },
            ", ",
        );
    }

    /// Emit UPDATE, SET parameters precede the WHERE ones.
    fn write_update(&self, context: &mut Context, out: &mut String, value: &Update) {
        out.push_str("UPDATE ");
        {
            let mut context = context.switch_fragment(Fragment::SqlUpdate);
            self.write_table_name(&mut context, out, &value.table);
            out.push_str(" SET ");
            separated_by(
                out,
                value.row.names().iter().zip(value.row.parameters()),
                |out, (name, parameter)| {
                    self.write_identifier_quoted(&mut context, out, name);
                    out.push_str(" = ");
                    self.write_parameter(&mut context, out, parameter);
                },
                ", ",
            );
        }
        if !value.filter.is_everything() {
            out.push(' ');
            self.write_where(
                &mut context.switch_fragment(Fragment::SqlUpdateWhere),
                out,
                &value.filter,
            );
        }
    }

    /// Token repeating the target table between `DELETE` and `FROM` when joins are present.
    fn write_delete_target(&self, context: &mut Context, out: &mut String, table: &TableRef) {
        self.write_identifier_quoted(context, out, table.reference());
        out.push(' ');
    }

    /// Emit DELETE statement with joins and WHERE clause.
    fn write_delete(&self, context: &mut Context, out: &mut String, value: &Delete) {
        out.push_str("DELETE ");
        if !value.joins.is_empty() {
            self.write_delete_target(context, out, &value.table);
        }
        out.push_str("FROM ");
        self.write_table_ref(
            &mut context.switch_fragment(Fragment::SqlDeleteFrom),
            out,
            &value.table,
        );
        for join in &value.joins {
            out.push(' ');
            self.write_join(context, out, join);
        }
        if !value.filter.is_everything() {
            out.push(' ');
            self.write_where(
                &mut context.switch_fragment(Fragment::SqlDeleteFromWhere),
                out,
                &value.filter,
            );
        }
    }

    /// Render the SQL type of a column.
    fn write_column_type(&self, _context: &mut Context, out: &mut String, value: &ColumnType) {
        let sized = |out: &mut String, name: &str, size: Option<u32>| {
            out.push_str(name);
            if let Some(size) = size {
                let _ = write!(out, "({})", size);
            }
        };
        match &value.kind {
            TypeKind::BigInt(size) => sized(out, "bigint", *size),
            TypeKind::Binary(length) => sized(out, "binary", Some(*length)),
            TypeKind::Bit(size) => sized(out, "bit", *size),
            TypeKind::Blob => out.push_str("blob"),
            TypeKind::Char(length) => sized(out, "char", Some(*length)),
            TypeKind::Date => out.push_str("date"),
            TypeKind::Datetime => out.push_str("datetime"),
            TypeKind::Decimal { precision, scale } => {
                let _ = write!(out, "decimal({},{})", precision, scale);
            }
            TypeKind::Double => out.push_str("double"),
            TypeKind::Float => out.push_str("float"),
            TypeKind::Int(size) => sized(out, "int", *size),
            TypeKind::Json => out.push_str("json"),
            TypeKind::LongText => out.push_str("longtext"),
            TypeKind::MediumInt(size) => sized(out, "mediumint", *size),
            TypeKind::MediumText => out.push_str("mediumtext"),
            TypeKind::SmallInt(size) => sized(out, "smallint", *size),
            TypeKind::Text => out.push_str("text"),
            TypeKind::TinyInt(size) => sized(out, "tinyint", *size),
            TypeKind::Varchar(length) => sized(out, "varchar", Some(*length)),
        }
    }

    fn write_column_comment_inline(&self, _context: &mut Context, _out: &mut String, _comment: &str) {
    }

    /// Emit single column definition fragment.
    fn write_create_table_column_fragment(
        &self,
        context: &mut Context,
        out: &mut String,
        column: &Column,
    ) {
        self.write_identifier_quoted(context, out, column.name.as_str());
        out.push(' ');
        self.write_column_type(context, out, &column.column_type);
        if !column.column_type.nullable {
            out.push_str(" NOT NULL");
        }
        if let Some(default) = &column.column_type.default {
            out.push_str(" DEFAULT ");
            self.write_value(context, out, default);
        }
        if let Some(comment) = &column.column_type.comment {
            self.write_column_comment_inline(context, out, comment);
        }
    }

    /// Emit a parenthesized list of column names.
    fn write_column_list(&self, context: &mut Context, out: &mut String, columns: &[ColumnName]) {
        out.push('(');
        separated_by(
            out,
            columns,
            |out, v| self.write_identifier_quoted(context, out, v.as_str()),
            ", ",
        );
        out.push(')');
    }

    /// Emit a table constraint.
    fn write_constraint(&self, context: &mut Context, out: &mut String, value: &Constraint) {
        let mut context = context.switch_fragment(Fragment::SqlCreateTableConstraint);
        if let Some(name) = value.name() {
            out.push_str("CONSTRAINT ");
            self.write_identifier_quoted(&mut context, out, name);
            out.push(' ');
        }
        match value {
            Constraint::PrimaryKey(primary_key) => {
                out.push_str("PRIMARY KEY ");
                self.write_column_list(&mut context, out, &primary_key.columns);
            }
            Constraint::Unique(unique) => {
                out.push_str("UNIQUE ");
                self.write_column_list(&mut context, out, &unique.columns);
            }
            Constraint::ForeignKey(foreign_key) => {
                out.push_str("FOREIGN KEY ");
                self.write_column_list(
                    &mut context,
                    out,
                    std::slice::from_ref(&foreign_key.column),
                );
                out.push_str(" REFERENCES ");
                self.write_table_name(&mut context, out, &foreign_key.target_table);
                out.push(' ');
                self.write_column_list(
                    &mut context,
                    out,
                    std::slice::from_ref(&foreign_key.target_column),
                );
                match foreign_key.on_delete {
                    Some(OnDelete::Cascade) => out.push_str(" ON DELETE CASCADE"),
                    Some(OnDelete::SetNull) => out.push_str(" ON DELETE SET NULL"),
                    None => {}
                }
            }
        }
    }

    /// Emit CREATE TABLE with columns and constraints.
    fn write_create_table(&self, context: &mut Context, out: &mut String, value: &CreateTable) {
        let mut context = context.switch_fragment(Fragment::SqlCreateTable);
        out.push_str("CREATE TABLE ");
        if value.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_table_name(&mut context, out, &value.table);
        out.push_str(" (\n");
        separated_by(
            out,
            &value.columns,
            |out, v| self.write_create_table_column_fragment(&mut context, out, v),
            ",\n",
        );
        for constraint in &value.constraints {
            if !value.columns.is_empty() {
                out.push_str(",\n");
            }
            self.write_constraint(&mut context, out, constraint);
        }
        out.push_str("\n)");
    }

    /// Emit the statement attaching a comment to a column, nothing when the dialect has none.
    fn write_column_comment_statement(
        &self,
        _context: &mut Context,
        _out: &mut String,
        _table: &TableName,
        _column: &Column,
    ) {
    }

    /// Emit DROP TABLE statement.
    fn write_drop_table(&self, context: &mut Context, out: &mut String, value: &DropTable) {
        out.push_str("DROP TABLE ");
        if value.if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_table_name(
            &mut context.switch_fragment(Fragment::SqlDropTable),
            out,
            &value.table,
        );
    }

    /// Emit BEGIN statement.
    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN");
    }

    /// Emit COMMIT statement.
    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT");
    }

    /// Emit ROLLBACK statement.
    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK");
    }
}
