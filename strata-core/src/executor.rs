use crate::{Driver, Query, QueryFailed, Rows};
use std::future::Future;

/// The connection boundary: one operation turning any query into rows.
///
/// Decorators implement it as well and must forward failures unchanged.
pub trait Executor: Send {
    fn driver(&self) -> Driver;

    /// Normalize the query for this driver, run it and return its rows.
    fn execute<Q>(&mut self, query: Q) -> impl Future<Output = Result<Rows, QueryFailed>> + Send
    where
        Q: Into<Query> + Send;
}
