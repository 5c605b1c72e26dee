use crate::{BindValue, Driver, Result, Row};
use futures::stream::BoxStream;
use std::future::Future;

/// Rows fetched from an open native statement.
///
/// Rows are pulled one at a time, dropping the cursor releases the native statement whether or not
/// it was exhausted.
pub type Cursor = BoxStream<'static, Result<Row>>;

/// A prepared native statement waiting for its parameters.
///
/// # Binding Semantics
/// * `bind_index` sets the parameter at `index`, counting from 1.
/// * `bind_name` sets the parameter written as `:name` in the statement text.
pub trait NativeStatement: Send {
    fn bind_index(&mut self, index: u64, value: BindValue) -> Result<&mut Self>;
    fn bind_name(&mut self, name: &str, value: BindValue) -> Result<&mut Self>;
}

/// Capability of a native database handle: prepare, bind, execute, fetch and transactions.
///
/// Implemented by each backend crate and owned by exactly one [`crate::Connection`]. Failures are
/// reported through `anyhow`, with a [`crate::DriverError`] in the chain whenever the backend
/// reported SQLSTATE, code or message.
pub trait NativeHandle: Send {
    type Statement: NativeStatement;

    fn driver(&self) -> Driver;

    fn prepare(&mut self, sql: &str) -> impl Future<Output = Result<Self::Statement>> + Send;

    /// Execute a bound statement, the returned cursor owns it.
    ///
    /// The statement has reached the database when the future resolves, execution failures are
    /// returned here rather than from the first poll of the cursor.
    fn run(&mut self, statement: Self::Statement) -> impl Future<Output = Result<Cursor>> + Send;

    fn begin(&mut self) -> impl Future<Output = Result<()>> + Send;

    fn commit(&mut self) -> impl Future<Output = Result<()>> + Send;

    fn rollback(&mut self) -> impl Future<Output = Result<()>> + Send;
}
