use crate::{Builder, Column, ColumnName, Driver, Fragment, Normalized, TableName, writer::Context};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnDelete {
    Cascade,
    SetNull,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PrimaryKey {
    pub name: Option<String>,
    pub columns: Vec<ColumnName>,
}

impl PrimaryKey {
    pub fn of(column: ColumnName) -> Self {
        Self {
            name: None,
            columns: vec![column],
        }
    }
    /// Extend into a composite key.
    pub fn and(mut self, column: ColumnName) -> Self {
        self.columns.push(column);
        self
    }
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ForeignKey {
    pub name: Option<String>,
    pub column: ColumnName,
    pub target_table: TableName,
    pub target_column: ColumnName,
    pub on_delete: Option<OnDelete>,
}

impl ForeignKey {
    pub fn of(column: ColumnName, target_table: TableName, target_column: ColumnName) -> Self {
        Self {
            name: None,
            column,
            target_table,
            target_column,
            on_delete: None,
        }
    }
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn on_delete_cascade(mut self) -> Self {
        self.on_delete = Some(OnDelete::Cascade);
        self
    }
    pub fn on_delete_set_null(mut self) -> Self {
        self.on_delete = Some(OnDelete::SetNull);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Unique {
    pub name: Option<String>,
    pub columns: Vec<ColumnName>,
}

impl Unique {
    pub fn of(columns: impl IntoIterator<Item = ColumnName>) -> Self {
        Self {
            name: None,
            columns: columns.into_iter().collect(),
        }
    }
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Table constraint clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    PrimaryKey(PrimaryKey),
    ForeignKey(ForeignKey),
    Unique(Unique),
}

impl Constraint {
    pub fn name(&self) -> Option<&str> {
        match self {
            Constraint::PrimaryKey(v) => v.name.as_deref(),
            Constraint::ForeignKey(v) => v.name.as_deref(),
            Constraint::Unique(v) => v.name.as_deref(),
        }
    }
}

impl From<PrimaryKey> for Constraint {
    fn from(value: PrimaryKey) -> Self {
        Constraint::PrimaryKey(value)
    }
}

impl From<ForeignKey> for Constraint {
    fn from(value: ForeignKey) -> Self {
        Constraint::ForeignKey(value)
    }
}

impl From<Unique> for Constraint {
    fn from(value: Unique) -> Self {
        Constraint::Unique(value)
    }
}

/// `CREATE TABLE [IF NOT EXISTS]` with column definitions and constraints.
///
/// On Postgres every column comment adds a `COMMENT ON COLUMN` statement after the table.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct CreateTable {
    pub table: TableName,
    pub if_not_exists: bool,
    pub columns: Vec<Column>,
    pub constraints: Vec<Constraint>,
}

impl CreateTable {
    pub fn named(table: TableName, columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            table,
            if_not_exists: false,
            columns: columns.into_iter().collect(),
            constraints: Vec::new(),
        }
    }
    pub fn if_not_exists(table: TableName, columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            if_not_exists: true,
            ..Self::named(table, columns)
        }
    }
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }
    pub fn primary_key(self, column: ColumnName) -> Self {
        self.constraint(PrimaryKey::of(column))
    }
    pub fn foreign_key(
        self,
        column: ColumnName,
        target_table: TableName,
        target_column: ColumnName,
    ) -> Self {
        self.constraint(ForeignKey::of(column, target_table, target_column))
    }
    pub fn constraint(mut self, constraint: impl Into<Constraint>) -> Self {
        self.constraints.push(constraint.into());
        self
    }
}

impl Builder for CreateTable {
    fn normalize(&self, driver: Driver) -> Normalized {
        Normalized::join(self.render(driver, true))
    }
    fn statements(&self, driver: Driver) -> Vec<Normalized> {
        self.render(driver, false)
    }
}

impl CreateTable {
    /// The table, then one statement per column comment when the dialect needs it. Placeholders
    /// are numbered across all of them when `continued`.
    fn render(&self, driver: Driver, continued: bool) -> Vec<Normalized> {
        let writer = driver.sql_writer();
        let mut context = Context::new(Fragment::None);
        let mut sql = String::with_capacity(128 + self.columns.len() * 32);
        writer.write_create_table(&mut context, &mut sql, self);
        let mut offset = if continued { context.placeholder() } else { 0 };
        let mut statements = vec![Normalized::from_context(sql, context, false)];
        for column in &self.columns {
            let mut context = Context::new(Fragment::SqlCommentOnColumn).with_offset(offset);
            let mut sql = String::new();
            writer.write_column_comment_statement(&mut context, &mut sql, &self.table, column);
            if !sql.is_empty() {
                if continued {
                    offset = context.placeholder();
                }
                statements.push(Normalized::from_context(sql, context, false));
            }
        }
        statements
    }
}
