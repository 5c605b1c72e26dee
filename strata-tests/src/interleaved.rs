use crate::{column, fetch, int, silent_logs, table};
use strata::{
    Column, ColumnName, ColumnType, CreateTable, Direction, Driver, DriverError, DropTable,
    Executor, MultipleInsert, Row, Rows, Select, stream::TryStreamExt,
};

async fn next(rows: &mut Rows) -> Option<i64> {
    let row = rows
        .try_next()
        .await
        .expect("Failed to fetch a row")
        .expect("The cursor ended early");
    int(&row, "n")
}

pub async fn interleaved<E: Executor>(executor: &mut E) {
    let numbers = table("strata_interleaved");
    let n = column("n");

    // Setup
    executor
        .execute(DropTable::if_exists(numbers.clone()))
        .await
        .expect("Failed to drop strata_interleaved");
    executor
        .execute(CreateTable::named(
            numbers.clone(),
            [Column::new(n.clone(), ColumnType::int())],
        ))
        .await
        .expect("Failed to create strata_interleaved");
    executor
        .execute((0..20).fold(
            MultipleInsert::into(numbers.clone(), [n.clone()]),
            |insert, v| insert.add(Row::default().with("n", v)),
        ))
        .await
        .expect("Failed to insert the numbers");

    let select = Select::on_demand(&numbers).order_by(&n, Direction::Asc);
    let mut first = executor
        .execute(select.clone())
        .await
        .expect("Failed to open the first cursor");
    for i in 0..3 {
        assert_eq!(next(&mut first).await, Some(i));
    }
    if executor.driver() == Driver::Sqlite {
        // Independent statements, each keeps its own position
        let mut second = executor
            .execute(select.clone())
            .await
            .expect("Failed to open the second cursor");
        for i in 0..5 {
            assert_eq!(next(&mut second).await, Some(i));
        }
        assert_eq!(next(&mut first).await, Some(3));
        assert_eq!(next(&mut second).await, Some(5));
        assert_eq!(next(&mut first).await, Some(4));
    } else {
        // The open cursor owns the connection until it is dropped
        let failure = silent_logs! {
            executor
                .execute(select.clone())
                .await
                .expect_err("A second query must not run while a cursor is open")
        };
        assert_eq!(failure.sqlstate(), DriverError::GENERAL);
        assert_eq!(next(&mut first).await, Some(3));
    }
    drop(first);

    // Abandoned cursors leave the connection clean
    let total = ColumnName::new("total").expect("Invalid alias");
    let rows = fetch(executor, Select::from(&numbers).count(total)).await;
    assert_eq!(int(&rows[0], "total"), Some(20));
}
