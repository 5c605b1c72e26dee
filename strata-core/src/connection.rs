use crate::{
    Builder, Cursor, Driver, DriverError, Error, ErrorContext, Executor, NativeHandle,
    NativeStatement, Normalized, Query, QueryFailed, Result, Rows, Transaction, truncate_long,
};
use futures::{StreamExt, TryStreamExt, future};
use std::future::Future;

/// Executor over a single native handle.
///
/// Tracks whether a transaction is open: `Commit` or `Rollback` while idle, and `StartTransaction`
/// while a transaction is already open, fail without reaching the backend.
pub struct Connection<H: NativeHandle> {
    handle: H,
    transaction: bool,
}

impl<H: NativeHandle> Connection<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            transaction: false,
        }
    }
    pub fn driver(&self) -> Driver {
        self.handle.driver()
    }
    pub fn in_transaction(&self) -> bool {
        self.transaction
    }
    pub fn handle(&mut self) -> &mut H {
        &mut self.handle
    }
    pub fn into_handle(self) -> H {
        self.handle
    }

    /// Run any query or builder.
    pub async fn execute(&mut self, query: impl Into<Query>) -> Result<Rows, QueryFailed> {
        let query = query.into();
        let driver = self.driver();
        if let Some(transaction) = query.transaction() {
            let normalized = query.normalize(driver);
            return self
                .transaction(transaction)
                .await
                .map(|_| Rows::empty())
                .map_err(|e| query_failed(&query, &normalized, e));
        }
        let statements = query.statements(driver);
        let Some((last, preceding)) = statements.split_last() else {
            return Ok(Rows::empty());
        };
        for normalized in preceding {
            self.run_to_end(normalized)
                .await
                .map_err(|e| query_failed(&query, normalized, e))?;
        }
        let cursor = self
            .run(last)
            .await
            .map_err(|e| query_failed(&query, last, e))?;
        if last.lazy {
            let normalized = last.clone();
            Ok(Rows::lazy(
                cursor
                    .map_err(move |e| query_failed(&query, &normalized, e))
                    .boxed(),
            ))
        } else {
            let rows = cursor
                .try_collect()
                .await
                .map_err(|e| query_failed(&query, last, e))?;
            Ok(Rows::buffered(rows))
        }
    }

    async fn transaction(&mut self, transaction: Transaction) -> Result<()> {
        match (transaction, self.transaction) {
            (Transaction::Start, false) => {
                self.handle.begin().await?;
                self.transaction = true;
            }
            (Transaction::Commit, true) => {
                self.handle.commit().await?;
                self.transaction = false;
            }
            (Transaction::Rollback, true) => {
                self.handle.rollback().await?;
                self.transaction = false;
            }
            (Transaction::Start, true) => {
                return Err(DriverError::new(
                    DriverError::INVALID_TRANSACTION_STATE,
                    None,
                    "A transaction is already active",
                )
                .into());
            }
            (Transaction::Commit | Transaction::Rollback, false) => {
                return Err(DriverError::new(
                    DriverError::INVALID_TRANSACTION_STATE,
                    None,
                    "There is no active transaction",
                )
                .into());
            }
        }
        Ok(())
    }

    /// Prepare, bind and execute one statement.
    async fn run(&mut self, normalized: &Normalized) -> Result<Cursor> {
        log::debug!("Executing:\n{}", truncate_long!(normalized.sql));
        let mut statement = self
            .handle
            .prepare(&normalized.sql)
            .await
            .with_context(|| "While preparing the query")?;
        for (i, parameter) in normalized.parameters.iter().enumerate() {
            let value = parameter.bind_value()?;
            let bound = match &parameter.name {
                Some(name) => statement.bind_name(name, value).map(|_| ()),
                None => statement.bind_index(i as u64 + 1, value).map(|_| ()),
            };
            bound.with_context(|| format!("While binding the parameter {}", i + 1))?;
        }
        self.handle
            .run(statement)
            .await
            .with_context(|| "While executing the query")
    }

    /// Run a statement whose rows are not wanted.
    async fn run_to_end(&mut self, normalized: &Normalized) -> Result<()> {
        self.run(normalized)
            .await?
            .try_for_each(|_| future::ok(()))
            .await
    }
}

fn query_failed(query: &Query, normalized: &Normalized, error: Error) -> QueryFailed {
    let failure = QueryFailed::new(query, normalized, error);
    log::error!("{:#}", failure.cause);
    failure
}

impl<H: NativeHandle> Executor for Connection<H> {
    fn driver(&self) -> Driver {
        Connection::driver(self)
    }

    fn execute<Q>(&mut self, query: Q) -> impl Future<Output = Result<Rows, QueryFailed>> + Send
    where
        Q: Into<Query> + Send,
    {
        Connection::execute(self, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BindValue, Commit, Insert, Parameter, ParameterType, Rollback, Row, RowNames, Sql,
        StartTransaction, TableName, Value,
    };
    use futures::{StreamExt, TryStreamExt, executor::block_on, stream};
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }
        fn take(&self) -> Vec<String> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    struct MockStatement {
        sql: String,
        bound: Vec<String>,
    }

    impl NativeStatement for MockStatement {
        fn bind_index(&mut self, index: u64, value: BindValue) -> Result<&mut Self> {
            self.bound.push(format!("{}={:?}", index, value));
            Ok(self)
        }
        fn bind_name(&mut self, name: &str, value: BindValue) -> Result<&mut Self> {
            if name == "missing" {
                return Err(DriverError::new("07009", None, "No such parameter").into());
            }
            self.bound.push(format!(":{}={:?}", name, value));
            Ok(self)
        }
    }

    /// Records every call, `SELECT` statements yield three rows.
    struct MockHandle {
        journal: Journal,
    }

    impl NativeHandle for MockHandle {
        type Statement = MockStatement;

        fn driver(&self) -> Driver {
            Driver::Sqlite
        }

        async fn prepare(&mut self, sql: &str) -> Result<MockStatement> {
            if sql.contains("missing_table") {
                return Err(DriverError::new("42S02", Some(1), "no such table").into());
            }
            self.journal.push(format!("prepare {}", sql));
            Ok(MockStatement {
                sql: sql.into(),
                bound: Vec::new(),
            })
        }

        async fn run(&mut self, statement: MockStatement) -> Result<Cursor> {
            self.journal.push(format!("run {}", statement.bound.join(",")));
            let labels: RowNames = vec!["n".to_string()].into();
            let count = if statement.sql.starts_with("SELECT") { 3 } else { 0 };
            let journal = self.journal.clone();
            Ok(stream::iter(0..count)
                .map(move |i| {
                    journal.push(format!("fetch {}", i));
                    Ok(Row::new(labels.clone(), Box::new([Value::Int(i)])))
                })
                .boxed())
        }

        async fn begin(&mut self) -> Result<()> {
            self.journal.push("begin");
            Ok(())
        }

        async fn commit(&mut self) -> Result<()> {
            self.journal.push("commit");
            Ok(())
        }

        async fn rollback(&mut self) -> Result<()> {
            self.journal.push("rollback");
            Ok(())
        }
    }

    fn connection() -> (Connection<MockHandle>, Journal) {
        let journal = Journal::default();
        let connection = Connection::new(MockHandle {
            journal: journal.clone(),
        });
        (connection, journal)
    }

    #[test]
    fn transaction_state() {
        let (mut connection, journal) = connection();
        block_on(async {
            let failure = connection.execute(Commit).await.unwrap_err();
            assert_eq!(failure.sqlstate(), DriverError::INVALID_TRANSACTION_STATE);
            assert_eq!(failure.query.transaction(), Some(Transaction::Commit));
            let failure = connection.execute(Rollback).await.unwrap_err();
            assert_eq!(failure.normalized.sql, "ROLLBACK");
            assert!(journal.take().is_empty());

            connection.execute(StartTransaction).await.unwrap();
            assert!(connection.in_transaction());
            let failure = connection.execute(StartTransaction).await.unwrap_err();
            assert_eq!(failure.sqlstate(), DriverError::INVALID_TRANSACTION_STATE);
            assert!(connection.in_transaction());
            let rows = connection.execute(Rollback).await.unwrap();
            assert_eq!(rows.count().await, 0);
            assert!(!connection.in_transaction());
            connection.execute(StartTransaction).await.unwrap();
            connection.execute(Commit).await.unwrap();
        });
        assert_eq!(journal.take(), ["begin", "rollback", "begin", "commit"]);
    }

    #[test]
    fn statements_run_in_order() {
        let (mut connection, journal) = connection();
        let insert = Insert::into(TableName::new("t").unwrap(), Row::of([("id", "a")]))
            .and(Row::of([("id", "b")]));
        let rows = block_on(connection.execute(insert)).unwrap();
        assert!(!rows.is_lazy());
        assert_eq!(
            journal.take(),
            [
                r#"prepare INSERT INTO "t" ("id") VALUES (?)"#,
                r#"run 1=Text("a")"#,
                r#"prepare INSERT INTO "t" ("id") VALUES (?)"#,
                r#"run 1=Text("b")"#,
            ]
        );
    }

    #[test]
    fn buffered_and_lazy() {
        let (mut connection, journal) = connection();
        block_on(async {
            let rows = connection.execute(Sql::of("SELECT n")).await.unwrap();
            assert_eq!(
                journal.take(),
                ["prepare SELECT n", "run ", "fetch 0", "fetch 1", "fetch 2"]
            );
            assert_eq!(rows.try_collect::<Vec<_>>().await.unwrap().len(), 3);

            let mut rows = connection.execute(Sql::lazily("SELECT n")).await.unwrap();
            assert!(rows.is_lazy());
            assert_eq!(journal.take(), ["prepare SELECT n", "run "]);
            let row = rows.try_next().await.unwrap().unwrap();
            assert_eq!(row.column("n"), Some(&Value::Int(0)));
            assert_eq!(journal.take(), ["fetch 0"]);
        });
    }

    #[test]
    fn parameters_by_position_and_name() {
        let (mut connection, journal) = connection();
        block_on(async {
            connection
                .execute(
                    Sql::of("INSERT :a ?")
                        .with(Parameter::named("a", true))
                        .with(Parameter::typed("7", ParameterType::Int))
                        .with(Parameter::of(None::<i32>)),
                )
                .await
                .unwrap();
        });
        assert_eq!(
            journal.take(),
            ["prepare INSERT :a ?", "run :a=Bool(true),2=Int(7),3=Null"]
        );
    }

    #[test]
    fn failures_carry_the_query() {
        let (mut connection, journal) = connection();
        block_on(async {
            let failure = connection
                .execute(Sql::of("SELECT ?").with(Parameter::typed("abc", ParameterType::Int)))
                .await
                .unwrap_err();
            assert_eq!(failure.sqlstate(), DriverError::INVALID_CAST);
            assert_eq!(failure.normalized.sql, "SELECT ?");
            assert_eq!(journal.take(), ["prepare SELECT ?"]);

            let failure = connection
                .execute(Sql::of("SELECT :missing").with(Parameter::named("missing", 1)))
                .await
                .unwrap_err();
            assert_eq!(failure.sqlstate(), "07009");

            let failure = connection
                .execute(Sql::of("SELECT * FROM missing_table"))
                .await
                .unwrap_err();
            assert_eq!(failure.sqlstate(), "42S02");
            assert_eq!(failure.code(), Some(1));
            assert_eq!(failure.message(), Some("no such table"));
            assert!(matches!(*failure.query, Query::Sql(..)));
        });
    }
}
