use crate::{
    Builder, ColumnName, ColumnRef, Driver, Fragment, Join, Normalized, TableRef,
    TypedValue, Where, writer::Context,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

/// One item of a projection list.
#[derive(Debug, Clone, PartialEq)]
pub enum Projected {
    Column(ColumnRef),
    /// Literal bound as a parameter, `? AS "column"`.
    Value(TypedValue),
}

impl<T: Into<ColumnRef>> From<T> for Projected {
    fn from(value: T) -> Self {
        Projected::Column(value.into())
    }
}

impl From<TypedValue> for Projected {
    fn from(value: TypedValue) -> Self {
        Projected::Value(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// Explicit columns, `*` when empty.
    Columns(Vec<Projected>),
    /// `COUNT(1) AS "alias"`.
    Count(ColumnName),
}

/// `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Select {
    pub table: TableRef,
    pub joins: Vec<Join>,
    pub projection: Projection,
    pub filter: Where,
    pub order: Option<(ColumnRef, Direction)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub lazy: bool,
}

impl Select {
    /// Buffered select.
    pub fn from(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            joins: Vec::new(),
            projection: Projection::Columns(Vec::new()),
            filter: Where::everything(),
            order: None,
            limit: None,
            offset: None,
            lazy: false,
        }
    }
    /// Select whose rows are fetched one at a time from an open cursor.
    pub fn on_demand(table: impl Into<TableRef>) -> Self {
        Self {
            lazy: true,
            ..Self::from(table)
        }
    }
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }
    /// Replace the projection with these columns, leaving count mode.
    pub fn columns<P: Into<Projected>>(mut self, columns: impl IntoIterator<Item = P>) -> Self {
        self.projection = Projection::Columns(columns.into_iter().map(Into::into).collect());
        self
    }
    /// Append one item to the projection, leaving count mode.
    pub fn column(mut self, column: impl Into<Projected>) -> Self {
        match &mut self.projection {
            Projection::Columns(columns) => columns.push(column.into()),
            Projection::Count(..) => self.projection = Projection::Columns(vec![column.into()]),
        }
        self
    }
    /// Select `COUNT(1)` only, any explicit column is dropped.
    pub fn count(mut self, alias: ColumnName) -> Self {
        self.projection = Projection::Count(alias);
        self
    }
    pub fn filter(mut self, filter: impl Into<Where>) -> Self {
        self.filter = filter.into();
        self
    }
    pub fn order_by(mut self, column: impl Into<ColumnRef>, direction: Direction) -> Self {
        self.order = Some((column.into(), direction));
        self
    }
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
    /// Rows to skip, rendered only together with a limit.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }
}

impl Builder for Select {
    fn normalize(&self, driver: Driver) -> Normalized {
        let mut context = Context::new(Fragment::None);
        let mut sql = String::with_capacity(128);
        driver.sql_writer().write_select(&mut context, &mut sql, self);
        Normalized::from_context(sql, context, self.lazy)
    }
}
