use crate::{ColumnRef, TableRef};

/// `LEFT JOIN table [ON left = right]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Option<(ColumnRef, ColumnRef)>,
}

impl Join {
    pub fn left(table: impl Into<TableRef>) -> Self {
        Self {
            table: table.into(),
            on: None,
        }
    }
    #[must_use]
    pub fn on(mut self, left: impl Into<ColumnRef>, right: impl Into<ColumnRef>) -> Self {
        self.on = Some((left.into(), right.into()));
        self
    }
}
