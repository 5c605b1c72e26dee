use crate::{fetch, int, silent_logs, table};
use strata::{Builder, DriverError, DropTable, Executor, Parameter, ParameterType, Query, Select, Sql};

pub async fn failure<E: Executor>(executor: &mut E) {
    let missing = table("strata_missing");
    executor
        .execute(DropTable::if_exists(missing.clone()))
        .await
        .expect("Failed to drop strata_missing");

    // The backend rejects the statement
    let select = Select::from(&missing);
    let failure = silent_logs! {
        executor
            .execute(select.clone())
            .await
            .expect_err("Selecting from a missing table must fail")
    };
    assert_eq!(*failure.query, Query::from(select.clone()));
    assert_eq!(failure.normalized, select.normalize(executor.driver()));
    assert!(!failure.sqlstate().is_empty());
    assert!(failure.message().is_some_and(|m| !m.is_empty()));
    assert!(std::error::Error::source(&failure).is_some());
    assert!(failure.to_string().contains(&failure.normalized.sql));

    // The parameter cannot take its declared type
    let failure = silent_logs! {
        executor
            .execute(Sql::of("SELECT 1").with(Parameter::typed("abc", ParameterType::Int)))
            .await
            .expect_err("Binding a non numeric string as integer must fail")
    };
    assert_eq!(failure.sqlstate(), DriverError::INVALID_CAST);

    // The connection is still usable
    let rows = fetch(executor, Sql::of("SELECT 1 AS one")).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(int(&rows[0], "one"), Some(1));
}
