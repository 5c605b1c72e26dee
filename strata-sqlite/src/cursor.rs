use crate::{
    CBox, driver_error,
    extract::{extract_name, extract_value},
};
use futures::Stream;
use libsqlite3_sys::*;
use std::{
    ffi::c_int,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use strata_core::{Result, Row, RowNames};

/// Rows of one executed statement, stepped once per poll.
///
/// The first step happens on creation, so the statement has run and any failure is reported before
/// the cursor exists. The statement is finalized when the cursor is dropped, exhausted or not. Several cursors over
/// the same database may be open and consumed in any interleaving.
pub struct SqliteCursor {
    // Declared before `connection`, finalized before the database can be closed.
    statement: CBox<*mut sqlite3_stmt>,
    connection: Arc<CBox<*mut sqlite3>>,
    labels: RowNames,
    count: c_int,
    first: Option<Row>,
    done: bool,
}

impl SqliteCursor {
    pub(crate) fn new(
        statement: CBox<*mut sqlite3_stmt>,
        connection: Arc<CBox<*mut sqlite3>>,
    ) -> Result<Self> {
        let (count, labels) = if statement.is_null() {
            (0, RowNames::default())
        } else {
            let count = unsafe { sqlite3_column_count(*statement) };
            let labels = (0..count)
                .map(|i| extract_name(*statement, i))
                .collect::<Result<RowNames>>()?;
            (count, labels)
        };
        let mut cursor = Self {
            done: statement.is_null(),
            statement,
            connection,
            labels,
            count,
            first: None,
        };
        cursor.first = cursor.step().transpose()?;
        Ok(cursor)
    }

    pub fn labels(&self) -> &RowNames {
        &self.labels
    }

    /// Advance to the next row.
    fn step(&mut self) -> Option<Result<Row>> {
        if self.done {
            return None;
        }
        match unsafe { sqlite3_step(*self.statement) } {
            SQLITE_DONE => {
                self.done = true;
                None
            }
            SQLITE_ROW => {
                let values = (0..self.count)
                    .map(|i| extract_value(*self.statement, i))
                    .collect::<Result<Box<[_]>>>();
                Some(values.map(|v| Row::new(self.labels.clone(), v)))
            }
            _ => {
                self.done = true;
                let error = driver_error(**self.connection);
                log::error!("{}", error);
                Some(Err(error.into()))
            }
        }
    }
}

impl Stream for SqliteCursor {
    type Item = Result<Row>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(row) = self.first.take() {
            return Poll::Ready(Some(Ok(row)));
        }
        Poll::Ready(self.step())
    }
}
