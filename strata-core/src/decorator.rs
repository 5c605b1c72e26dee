use crate::{Builder, Driver, Executor, Query, QueryFailed, Result, Rows, truncate_long};
use log::Level;
use std::future::Future;

/// Logs every statement and every failure, then forwards to the inner executor.
pub struct LoggedConnection<E: Executor> {
    inner: E,
    level: Level,
}

impl<E: Executor> LoggedConnection<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            level: Level::Info,
        }
    }
    /// Level of the statement records, failures are always logged as errors.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E: Executor> Executor for LoggedConnection<E> {
    fn driver(&self) -> Driver {
        self.inner.driver()
    }

    fn execute<Q>(&mut self, query: Q) -> impl Future<Output = Result<Rows, QueryFailed>> + Send
    where
        Q: Into<Query> + Send,
    {
        let query = query.into();
        async move {
            if log::log_enabled!(self.level) {
                let normalized = query.normalize(self.inner.driver());
                log::log!(self.level, "{}", truncate_long!(normalized.sql));
            }
            let result = self.inner.execute(query).await;
            if let Err(e) = &result {
                log::error!("{:#}", e);
            }
            result
        }
    }
}

/// Builds the inner executor on first use.
///
/// A factory failure is reported as the failure of the query that triggered it, the next query
/// tries again.
pub struct DeferredConnection<E, F> {
    driver: Driver,
    factory: F,
    inner: Option<E>,
}

impl<E, F, Fut> DeferredConnection<E, F>
where
    E: Executor,
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<E>> + Send,
{
    pub fn new(driver: Driver, factory: F) -> Self {
        Self {
            driver,
            factory,
            inner: None,
        }
    }
    pub fn is_connected(&self) -> bool {
        self.inner.is_some()
    }
}

impl<E, F, Fut> Executor for DeferredConnection<E, F>
where
    E: Executor,
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<E>> + Send,
{
    fn driver(&self) -> Driver {
        self.driver
    }

    fn execute<Q>(&mut self, query: Q) -> impl Future<Output = Result<Rows, QueryFailed>> + Send
    where
        Q: Into<Query> + Send,
    {
        let query = query.into();
        async move {
            let inner = match self.inner.take() {
                Some(inner) => inner,
                None => match (self.factory)().await {
                    Ok(inner) => inner,
                    Err(e) => {
                        let normalized = query.normalize(self.driver);
                        let failure = QueryFailed::new(
                            &query,
                            &normalized,
                            e.context("While establishing the connection"),
                        );
                        log::error!("{:#}", failure.cause);
                        return Err(failure);
                    }
                },
            };
            self.inner.insert(inner).execute(query).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Commit, DriverError, Sql, Value};
    use futures::{TryStreamExt, executor::block_on};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    /// Answers every query with one row holding its SQL text.
    struct Echo;

    impl Executor for Echo {
        fn driver(&self) -> Driver {
            Driver::Sqlite
        }
        fn execute<Q>(&mut self, query: Q) -> impl Future<Output = Result<Rows, QueryFailed>> + Send
        where
            Q: Into<Query> + Send,
        {
            let query = query.into();
            async move {
                let normalized = query.normalize(Driver::Sqlite);
                if normalized.sql == "COMMIT" {
                    return Err(QueryFailed::new(
                        &query,
                        &normalized,
                        DriverError::new("25000", None, "no transaction").into(),
                    ));
                }
                Ok(Rows::buffered(vec![crate::Row::of([("sql", normalized.sql)])]))
            }
        }
    }

    #[test]
    fn logged_connection_forwards() {
        let mut connection = LoggedConnection::new(Echo).level(Level::Debug);
        let rows: Vec<_> = block_on(async {
            connection
                .execute(Sql::of("SELECT 1"))
                .await
                .unwrap()
                .try_collect()
                .await
                .unwrap()
        });
        assert_eq!(rows[0].column("sql"), Some(&Value::String("SELECT 1".into())));
        let failure = block_on(connection.execute(Commit)).unwrap_err();
        assert_eq!(failure.sqlstate(), "25000");
    }

    #[test]
    fn deferred_connection_retries_the_factory() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let mut connection = DeferredConnection::new(Driver::Sqlite, move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(anyhow::anyhow!("refused"))
                } else {
                    Ok(Echo)
                }
            }
        });
        assert!(!connection.is_connected());
        let failure = block_on(connection.execute(Sql::of("SELECT 1"))).unwrap_err();
        assert_eq!(failure.sqlstate(), DriverError::GENERAL);
        assert_eq!(failure.normalized.sql, "SELECT 1");
        assert!(block_on(connection.execute(Sql::of("SELECT 2"))).is_ok());
        assert!(block_on(connection.execute(Sql::of("SELECT 3"))).is_ok());
        assert!(connection.is_connected());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
