use crate::{BindHolder, PostgresStatement, driver_error, row_to_strata_row};
use async_stream::try_stream;
use std::{env, pin::pin, sync::Arc};
use strata_core::{
    Connection, Cursor, Driver, DriverError, Dsn, Error, ErrorContext, NativeHandle, Result,
    RowNames, SqlWriter,
    stream::{self, StreamExt, TryStreamExt},
    truncate_long,
};
use tokio::{
    spawn,
    sync::{Mutex, OwnedMutexGuard},
};
use tokio_postgres::{Client, NoTls};

/// Client of one Postgres session.
///
/// The server streams the rows of one statement at a time: while a cursor is open every other
/// call fails with `HY000` instead of waiting for it.
pub struct PostgresHandle {
    pub(crate) client: Client,
    busy: Arc<Mutex<()>>,
}

/// Connect to a `postgres://` url and wrap the session in a connection.
pub async fn connect(url: &str) -> Result<Connection<PostgresHandle>> {
    Ok(Connection::new(PostgresHandle::connect(url).await?))
}

impl PostgresHandle {
    pub async fn connect(url: &str) -> Result<PostgresHandle> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let mut dsn = Dsn::parse(url)?;
        if dsn.driver != Driver::Postgres {
            let error = Error::msg(format!(
                "Expected a postgres connection url, found a {} one",
                dsn.driver
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let sslmode = dsn
            .take_option("sslmode")
            .or_else(|| env::var("PGSSLMODE").ok())
            .unwrap_or("disable".into());
        if sslmode != "disable" {
            let error = Error::msg(format!(
                "Unsupported sslmode `{}`, only `disable` is available",
                sslmode
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let (client, connection) = tokio_postgres::connect(&dsn.url("postgresql")?, NoTls)
            .await
            .map_err(driver_error)
            .with_context(context)?;
        spawn(async move {
            if let Err(e) = connection.await
                && !e.is_closed()
            {
                log::error!("Postgres connection error: {:#}", e);
            }
        });
        if let Some(charset) = &dsn.charset {
            client
                .batch_execute(&format!(
                    "SET client_encoding TO '{}'",
                    charset.replace('\'', "''")
                ))
                .await
                .map_err(driver_error)
                .with_context(|| format!("While setting the charset `{}`", charset))?;
        }
        Ok(Self {
            client,
            busy: Default::default(),
        })
    }

    fn acquire(&self) -> Result<OwnedMutexGuard<()>> {
        self.busy
            .clone()
            .try_lock_owned()
            .map_err(|_| DriverError::general("connection busy: a cursor is still open").into())
    }

    async fn batch(&mut self, write: fn(&dyn SqlWriter, &mut String)) -> Result<()> {
        let _guard = self.acquire()?;
        let mut sql = String::new();
        write(Driver::Postgres.sql_writer(), &mut sql);
        self.client.batch_execute(&sql).await.map_err(driver_error)
    }
}

impl NativeHandle for PostgresHandle {
    type Statement = PostgresStatement;

    fn driver(&self) -> Driver {
        Driver::Postgres
    }

    async fn prepare(&mut self, sql: &str) -> Result<PostgresStatement> {
        let _guard = self.acquire()?;
        let sql = sql.trim_end().trim_end_matches(';');
        let statement = self.client.prepare(sql).await.map_err(driver_error)?;
        Ok(PostgresStatement::new(statement))
    }

    async fn run(&mut self, mut statement: PostgresStatement) -> Result<Cursor> {
        let guard = self.acquire()?;
        let params = statement.take_params()?;
        let labels: RowNames = statement
            .statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let rows = self
            .client
            .query_raw(&statement.statement, params.into_iter().map(BindHolder))
            .await
            .map_err(driver_error)?;
        let mut rows = try_stream! {
            let _guard = guard;
            let mut rows = pin!(rows.map_err(driver_error));
            while let Some(row) = rows.try_next().await? {
                yield row_to_strata_row(&labels, row)?;
            }
        }
        .boxed();
        // Execution errors arrive with the rows, the first one is awaited before returning.
        let first = rows.next().await.transpose()?;
        Ok(stream::iter(first.map(Ok)).chain(rows).boxed())
    }

    async fn begin(&mut self) -> Result<()> {
        self.batch(|w, out| w.write_transaction_begin(out)).await
    }

    async fn commit(&mut self) -> Result<()> {
        self.batch(|w, out| w.write_transaction_commit(out)).await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.batch(|w, out| w.write_transaction_rollback(out)).await
    }
}
