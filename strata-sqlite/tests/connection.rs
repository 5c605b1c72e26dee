#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        path::PathBuf,
        process,
        time::{Duration, Instant},
    };
    use strata_core::{
        Commit, Driver, DriverError, Executor, Parameter, Sql, StartTransaction, TableName,
        stream::TryStreamExt,
    };
    use strata_sqlite::connect;
    use strata_tests::{init_logs, silent_logs};

    fn database(name: &str) -> PathBuf {
        env::temp_dir().join(format!("strata_{}_{}.sqlite", name, process::id()))
    }

    #[tokio::test]
    async fn create_database() {
        init_logs();
        let path = database("creation");
        let _ = fs::remove_file(&path);
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let connection = connect(&url).await.expect("Could not open the database");
        assert_eq!(connection.driver(), Driver::Sqlite);
        assert!(path.exists(), "The database file must be created");
        drop(connection);
        connect(&format!("sqlite://{}?mode=ro", path.display()))
            .await
            .expect("Could not open the database in read only mode");
        fs::remove_file(&path).expect("Could not remove the database file");
        let result = silent_logs! {
            connect(&format!("sqlite://{}?mode=ro", path.display())).await
        };
        assert!(
            result.is_err(),
            "A missing database cannot be opened in read only mode"
        );
    }

    #[tokio::test]
    async fn wrong_url() {
        init_logs();
        silent_logs! {
            assert!(connect("postgres://localhost/db").await.is_err());
            assert!(connect("some_value").await.is_err());
        }
    }

    #[tokio::test]
    async fn named_parameters() {
        init_logs();
        let mut connection = connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        let rows = connection
            .execute(
                Sql::of("SELECT :b - :a AS difference")
                    .with(Parameter::named("a", 2))
                    .with(Parameter::named("b", 44)),
            )
            .await
            .expect("Failed to run the query")
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to fetch the rows");
        assert_eq!(
            rows[0].column("difference").and_then(|v| v.as_i64()),
            Some(42)
        );
        let failure = silent_logs! {
            connection
                .execute(Sql::of("SELECT :a").with(Parameter::named("missing", 1)))
                .await
                .expect_err("Binding an unknown name must fail")
        };
        assert_ne!(failure.sqlstate(), DriverError::INVALID_CAST);
    }

    #[tokio::test]
    async fn one_statement_at_a_time() {
        init_logs();
        let mut connection = connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        let result = silent_logs! {
            connection.execute(Sql::of("SELECT 1; SELECT 2")).await
        };
        assert!(result.is_err());
        let rows = connection
            .execute(Sql::of("SELECT 1 AS one;  "))
            .await
            .expect("A trailing semicolon is accepted")
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to fetch the rows");
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn constraint_violation() {
        init_logs();
        let mut connection = connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        let table = TableName::new("unique_values").unwrap();
        connection
            .execute(Sql::of(format!(
                "CREATE TABLE {} (v INTEGER PRIMARY KEY)",
                table.sql(Driver::Sqlite)
            )))
            .await
            .expect("Failed to create the table");
        let insert = Sql::of(format!("INSERT INTO {} (v) VALUES (?)", table.sql(Driver::Sqlite)))
            .with(1);
        connection
            .execute(insert.clone())
            .await
            .expect("Failed to insert");
        let failure = silent_logs! {
            connection
                .execute(insert)
                .await
                .expect_err("Inserting the same primary key twice must fail")
        };
        assert_eq!(failure.sqlstate(), "23000");
        assert!(failure.code().is_some());
    }

    async fn count(connection: &mut impl Executor, table: &str) -> Option<i64> {
        let rows = connection
            .execute(Sql::of(format!("SELECT COUNT(1) AS n FROM {}", table)))
            .await
            .expect("Failed to count the rows")
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to fetch the rows");
        rows[0].column("n").and_then(|v| v.as_i64())
    }

    #[tokio::test]
    async fn lazy_write_runs_without_polling() {
        init_logs();
        let mut connection = connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        connection
            .execute(Sql::of("CREATE TABLE t (n INTEGER UNIQUE)"))
            .await
            .expect("Failed to create the table");
        let rows = connection
            .execute(Sql::lazily("INSERT INTO t (n) VALUES (1)"))
            .await
            .expect("Failed to insert");
        drop(rows);
        assert_eq!(count(&mut connection, "t").await, Some(1));

        let failure = silent_logs! {
            connection
                .execute(Sql::lazily("INSERT INTO t (n) VALUES (1)"))
                .await
                .map(|_| ())
                .expect_err("A lazy duplicate insert must fail on execute")
        };
        assert_eq!(failure.sqlstate(), "23000");
        assert!(failure.code().is_some());
        assert_eq!(count(&mut connection, "t").await, Some(1));
    }

    #[tokio::test]
    async fn lazy_select_yields_every_row() {
        init_logs();
        let mut connection = connect("sqlite://:memory:")
            .await
            .expect("Could not open the database");
        let rows = connection
            .execute(Sql::lazily(
                "SELECT 1 AS n UNION ALL SELECT 2 UNION ALL SELECT 3",
            ))
            .await
            .expect("Failed to run the query")
            .try_collect::<Vec<_>>()
            .await
            .expect("Failed to fetch the rows");
        let values: Vec<_> = rows
            .iter()
            .filter_map(|r| r.column("n").and_then(|v| v.as_i64()))
            .collect();
        assert_eq!(values, [1, 2, 3]);
    }

    #[tokio::test]
    async fn locked_database_times_out() {
        init_logs();
        let path = database("locked");
        let _ = fs::remove_file(&path);
        let url = format!("sqlite://{}?mode=rwc&busy_timeout=100", path.display());
        let mut first = connect(&url).await.expect("Could not open the database");
        let mut second = connect(&url).await.expect("Could not open the database");
        first
            .execute(Sql::of("CREATE TABLE t (n INTEGER)"))
            .await
            .expect("Failed to create the table");
        first
            .execute(StartTransaction)
            .await
            .expect("Failed to begin");
        first
            .execute(Sql::of("INSERT INTO t (n) VALUES (1)"))
            .await
            .expect("Failed to insert");
        let started = Instant::now();
        let failure = silent_logs! {
            second
                .execute(Sql::of("INSERT INTO t (n) VALUES (2)"))
                .await
                .map(|_| ())
                .expect_err("Writing to a locked database must fail once the timeout expires")
        };
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert_eq!(failure.sqlstate(), DriverError::GENERAL);
        assert_eq!(failure.code().map(|c| c & 0xff), Some(5));
        first.execute(Commit).await.expect("Failed to commit");
        second
            .execute(Sql::of("INSERT INTO t (n) VALUES (2)"))
            .await
            .expect("The lock is released after the commit");
        assert_eq!(count(&mut second, "t").await, Some(2));
        drop((first, second));
        let _ = fs::remove_file(&path);
        let result = silent_logs! {
            connect("sqlite://:memory:?busy_timeout=soon").await
        };
        assert!(result.is_err());
    }
}
