use crate::{column, fetch, int, memory, silent_logs, table};
use strata::{
    Column, ColumnType, Commit, CreateTable, Direction, DropTable, Executor, MultipleInsert, Row,
    Select, Sql, StartTransaction, stream::TryStreamExt,
};

const ROWS: i64 = 100_000;
const BATCH: i64 = 1_000;
const MEGABYTE: usize = 1 << 20;

pub async fn lazy<E: Executor>(executor: &mut E) {
    let numbers = table("strata_lazy");
    let n = column("n");

    // Setup
    executor
        .execute(DropTable::if_exists(numbers.clone()))
        .await
        .expect("Failed to drop strata_lazy");
    executor
        .execute(CreateTable::named(
            numbers.clone(),
            [Column::new(n.clone(), ColumnType::bigint())],
        ))
        .await
        .expect("Failed to create strata_lazy");
    executor
        .execute(StartTransaction)
        .await
        .expect("Failed to start a transaction");
    for start in (0..ROWS).step_by(BATCH as usize) {
        let insert = (start..start + BATCH).fold(
            MultipleInsert::into(numbers.clone(), [n.clone()]),
            |insert, v| insert.add(Row::default().with("n", v)),
        );
        executor
            .execute(insert)
            .await
            .expect("Failed to insert a batch of numbers");
    }
    executor.execute(Commit).await.expect("Failed to commit");

    // Pull one row at a time
    let baseline = memory::reset_peak();
    let mut rows = executor
        .execute(Select::on_demand(&numbers).order_by(&n, Direction::Asc))
        .await
        .expect("Failed to open the cursor");
    assert!(rows.is_lazy());
    let mut expected = 0;
    while let Some(row) = rows.try_next().await.expect("Failed to fetch a row") {
        assert_eq!(int(&row, "n"), Some(expected));
        expected += 1;
    }
    assert_eq!(expected, ROWS);
    drop(rows);
    let lazy_peak = memory::peak().saturating_sub(baseline);
    assert!(
        lazy_peak < 8 * MEGABYTE,
        "Walking {} rows lazily held {} bytes at once",
        ROWS,
        lazy_peak
    );

    // The same rows buffered
    let baseline = memory::reset_peak();
    let rows = fetch(executor, Select::from(&numbers)).await;
    let eager_peak = memory::peak().saturating_sub(baseline);
    assert_eq!(rows.len() as i64, ROWS);
    drop(rows);
    assert!(
        eager_peak >= ROWS as usize * size_of::<Row>(),
        "Buffering {} rows held only {} bytes",
        ROWS,
        eager_peak
    );
    assert!(
        lazy_peak * 2 < eager_peak,
        "Lazy peak {} is not well below the buffered peak {}",
        lazy_peak,
        eager_peak
    );

    // Abandoned early
    let mut rows = executor
        .execute(Select::on_demand(&numbers))
        .await
        .expect("Failed to open the cursor");
    for _ in 0..10 {
        rows.try_next()
            .await
            .expect("Failed to fetch a row")
            .expect("The cursor ended early");
    }
    drop(rows);
    executor
        .execute(DropTable::named(numbers.clone()))
        .await
        .expect("Failed to drop strata_lazy after an abandoned cursor");
}

/// A lazy statement runs when executed, whether or not its rows are ever pulled.
pub async fn lazy_writes<E: Executor>(executor: &mut E) {
    let keys = table("strata_lazy_writes");
    let id = column("id");
    let name = keys.sql(executor.driver());

    // Setup
    executor
        .execute(DropTable::if_exists(keys.clone()))
        .await
        .expect("Failed to drop strata_lazy_writes");
    executor
        .execute(
            CreateTable::named(keys.clone(), [Column::new(id.clone(), ColumnType::int())])
                .primary_key(id.clone()),
        )
        .await
        .expect("Failed to create strata_lazy_writes");

    // Never polled
    let rows = executor
        .execute(Sql::lazily(format!("INSERT INTO {} (id) VALUES (1)", name)))
        .await
        .expect("Failed to insert lazily");
    drop(rows);
    let rows = fetch(executor, Select::from(&keys).count(column("total"))).await;
    assert_eq!(int(&rows[0], "total"), Some(1));

    // Failure surfaces from execute
    let failure = silent_logs! {
        executor
            .execute(Sql::lazily(format!("INSERT INTO {} (id) VALUES (1)", name)))
            .await
            .map(|_| ())
            .expect_err("A lazy duplicate insert must fail when executed")
    };
    assert!(
        failure.sqlstate().starts_with("23"),
        "Unexpected sqlstate {}",
        failure.sqlstate()
    );
    let rows = fetch(executor, Select::from(&keys).count(column("total"))).await;
    assert_eq!(int(&rows[0], "total"), Some(1));

    executor
        .execute(DropTable::named(keys.clone()))
        .await
        .expect("Failed to drop strata_lazy_writes");
}
