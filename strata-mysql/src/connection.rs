use crate::{MySqlStatement, driver_error, row_to_strata_row};
use async_stream::try_stream;
use mysql_async::{Conn, Opts, prelude::Queryable};
use std::sync::Arc;
use strata_core::{
    Connection, Cursor, Driver, DriverError, Dsn, Error, ErrorContext, NativeHandle, Result,
    RowNames, SqlWriter,
    stream::{self, StreamExt},
    truncate_long,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One MySQL session.
///
/// A cursor owns the session until it is dropped, meanwhile every other call fails with `HY000`
/// instead of waiting for it.
pub struct MySqlHandle {
    pub(crate) connection: Arc<Mutex<Conn>>,
}

/// Connect to a `mysql://` or `mariadb://` url and wrap the session in a connection.
pub async fn connect(url: &str) -> Result<Connection<MySqlHandle>> {
    Ok(Connection::new(MySqlHandle::connect(url).await?))
}

impl MySqlHandle {
    pub async fn connect(url: &str) -> Result<MySqlHandle> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let dsn = Dsn::parse(url)?;
        if dsn.driver != Driver::MySql {
            let error = Error::msg(format!(
                "Expected a mysql connection url, found a {} one",
                dsn.driver
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let config = Opts::from_url(&dsn.url("mysql")?).with_context(context)?;
        let mut connection = Conn::new(config)
            .await
            .map_err(driver_error)
            .with_context(context)?;
        if let Some(charset) = &dsn.charset {
            connection
                .query_drop(format!("SET NAMES '{}'", charset.replace('\'', "''")))
                .await
                .map_err(driver_error)
                .with_context(|| format!("While setting the charset `{}`", charset))?;
        }
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn acquire(&self) -> Result<OwnedMutexGuard<Conn>> {
        self.connection
            .clone()
            .try_lock_owned()
            .map_err(|_| DriverError::general("connection busy: a cursor is still open").into())
    }

    async fn query_drop(&mut self, write: fn(&dyn SqlWriter, &mut String)) -> Result<()> {
        let mut connection = self.acquire()?;
        let mut sql = String::new();
        write(Driver::MySql.sql_writer(), &mut sql);
        connection.query_drop(sql).await.map_err(driver_error)
    }
}

impl NativeHandle for MySqlHandle {
    type Statement = MySqlStatement;

    fn driver(&self) -> Driver {
        Driver::MySql
    }

    async fn prepare(&mut self, sql: &str) -> Result<MySqlStatement> {
        let mut connection = self.acquire()?;
        let statement = connection.prep(sql).await.map_err(driver_error)?;
        Ok(MySqlStatement::new(statement, sql))
    }

    async fn run(&mut self, mut statement: MySqlStatement) -> Result<Cursor> {
        let mut connection = self.acquire()?;
        let params = statement.take_params()?;
        let labels: RowNames = statement
            .statement
            .columns()
            .iter()
            .map(|c| c.name_str().into_owned())
            .collect();
        let mut rows = try_stream! {
            let mut result = connection
                .exec_iter(statement.statement, params)
                .await
                .map_err(driver_error)?;
            while let Some(row) = result.next().await.map_err(driver_error)? {
                yield row_to_strata_row(&labels, row)?;
            }
        }
        .boxed();
        // The result borrows the session, pulling the first row executes the statement here.
        let first = rows.next().await.transpose()?;
        Ok(stream::iter(first.map(Ok)).chain(rows).boxed())
    }

    async fn begin(&mut self) -> Result<()> {
        self.query_drop(|w, out| w.write_transaction_begin(out)).await
    }

    async fn commit(&mut self) -> Result<()> {
        self.query_drop(|w, out| w.write_transaction_commit(out)).await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.query_drop(|w, out| w.write_transaction_rollback(out)).await
    }
}
