use crate::{column, fetch, silent_logs, table, text};
use strata::{
    Column, ColumnType, Commit, CreateTable, DriverError, DropTable, Executor, Insert, Query,
    Rollback, Row, Select, StartTransaction, Transaction,
};

pub async fn transactions<E: Executor>(executor: &mut E) {
    let entries = table("strata_transactions");

    // Setup
    executor
        .execute(DropTable::if_exists(entries.clone()))
        .await
        .expect("Failed to drop strata_transactions");
    executor
        .execute(CreateTable::named(
            entries.clone(),
            [Column::new(column("name"), ColumnType::varchar(32))],
        ))
        .await
        .expect("Failed to create strata_transactions");

    // Nothing to end
    for query in [Query::from(Commit), Query::from(Rollback)] {
        let failure = silent_logs! {
            executor
                .execute(query.clone())
                .await
                .expect_err("Ending a transaction that was never started must fail")
        };
        assert_eq!(failure.sqlstate(), DriverError::INVALID_TRANSACTION_STATE);
        assert_eq!(*failure.query, query);
    }

    // Rolled back content disappears
    let rows = fetch(executor, StartTransaction).await;
    assert!(rows.is_empty());
    executor
        .execute(Insert::into(
            entries.clone(),
            Row::default().with("name", "discarded"),
        ))
        .await
        .expect("Failed to insert inside the transaction");
    let rows = fetch(executor, Select::from(&entries)).await;
    assert_eq!(rows.len(), 1, "Content is visible before the commit");
    assert_eq!(text(&rows[0], "name"), Some("discarded"));
    executor
        .execute(Rollback)
        .await
        .expect("Failed to roll back");
    assert!(fetch(executor, Select::from(&entries)).await.is_empty());

    // Committed content stays
    executor
        .execute(StartTransaction)
        .await
        .expect("Failed to start a transaction");
    let failure = silent_logs! {
        executor
            .execute(StartTransaction)
            .await
            .expect_err("Nested transactions are not supported")
    };
    assert_eq!(failure.sqlstate(), DriverError::INVALID_TRANSACTION_STATE);
    assert!(matches!(
        *failure.query,
        Query::Transaction(Transaction::Start)
    ));
    executor
        .execute(Insert::into(entries.clone(), Row::default().with("name", "kept")))
        .await
        .expect("Failed to insert inside the transaction");
    executor.execute(Commit).await.expect("Failed to commit");
    let rows = fetch(executor, Select::from(&entries)).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(text(&rows[0], "name"), Some("kept"));
    let result = silent_logs! { executor.execute(Commit).await };
    assert!(result.is_err(), "The transaction is already over");
}
