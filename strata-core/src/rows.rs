use crate::{QueryFailed, Row};
use futures::{Stream, stream::BoxStream};
use std::{
    fmt::{self, Debug},
    pin::Pin,
    task::{Context, Poll},
    vec,
};

enum Inner {
    Buffered(vec::IntoIter<Row>),
    Cursor(BoxStream<'static, Result<Row, QueryFailed>>),
}

/// Single pass sequence of rows returned by an executor.
///
/// A buffered sequence already holds every row. A lazy one pulls each row from the open cursor
/// when polled, and releases the cursor when dropped.
pub struct Rows {
    inner: Inner,
}

impl Rows {
    pub fn empty() -> Self {
        Self::buffered(Vec::new())
    }
    pub fn buffered(rows: Vec<Row>) -> Self {
        Self {
            inner: Inner::Buffered(rows.into_iter()),
        }
    }
    pub fn lazy(cursor: BoxStream<'static, Result<Row, QueryFailed>>) -> Self {
        Self {
            inner: Inner::Cursor(cursor),
        }
    }
    pub fn is_lazy(&self) -> bool {
        matches!(self.inner, Inner::Cursor(..))
    }
}

impl Stream for Rows {
    type Item = Result<Row, QueryFailed>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match &mut self.inner {
            Inner::Buffered(rows) => Poll::Ready(rows.next().map(Ok)),
            Inner::Cursor(cursor) => cursor.as_mut().poll_next(cx),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Inner::Buffered(rows) => rows.size_hint(),
            Inner::Cursor(cursor) => cursor.size_hint(),
        }
    }
}

impl Debug for Rows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rows")
            .field("lazy", &self.is_lazy())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{StreamExt, TryStreamExt, executor::block_on, stream};

    #[test]
    fn buffered_and_lazy_yield_the_same() {
        let rows = vec![Row::of([("a", 1)]), Row::of([("a", 2)])];
        let buffered = Rows::buffered(rows.clone());
        assert!(!buffered.is_lazy());
        assert_eq!(block_on(buffered.try_collect::<Vec<_>>()).unwrap(), rows);
        let lazy = Rows::lazy(stream::iter(rows.clone().into_iter().map(Ok)).boxed());
        assert!(lazy.is_lazy());
        assert_eq!(block_on(lazy.try_collect::<Vec<_>>()).unwrap(), rows);
        assert_eq!(block_on(Rows::empty().count()), 0);
    }
}
