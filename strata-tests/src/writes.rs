use crate::{column, fetch, int, table, text};
use strata::{
    Column, ColumnType, CreateTable, Direction, DropTable, Executor, Insert, MultipleInsert, Row,
    Select, Specification,
};

pub async fn writes<E: Executor>(executor: &mut E) {
    let source = table("strata_writes_source");
    let copy = table("strata_writes_copy");
    let id = column("id");
    let name = column("name");
    for table in [&source, &copy] {
        executor
            .execute(DropTable::if_exists(table.clone()))
            .await
            .expect("Failed to drop the table");
        executor
            .execute(
                CreateTable::named(
                    table.clone(),
                    [
                        Column::new(id.clone(), ColumnType::int()),
                        Column::new(name.clone(), ColumnType::varchar(32)),
                    ],
                )
                .primary_key(id.clone()),
            )
            .await
            .expect("Failed to create the table");
    }

    // One statement per row
    let insert = Insert::into(source.clone(), Row::default().with("id", 1).with("name", "one"))
        .and(Row::default().with("id", 2).with("name", "two"))
        .and(Row::default().with("id", 3).with("name", "three"));
    executor
        .execute(insert)
        .await
        .expect("Failed to insert three rows");

    // Single multi row statement
    let insert = MultipleInsert::into(source.clone(), [id.clone(), name.clone()])
        .add(Row::default().with("id", 4).with("name", "four"))
        .add(Row::default().with("id", 5).with("name", "five"));
    assert_eq!(insert.len(), 2);
    executor
        .execute(insert)
        .await
        .expect("Failed to insert two rows at once");
    let rows = fetch(
        executor,
        Select::from(&source).order_by(&id, Direction::Asc),
    )
    .await;
    assert_eq!(
        rows.iter().filter_map(|r| int(r, "id")).collect::<Vec<_>>(),
        [1, 2, 3, 4, 5]
    );
    assert_eq!(
        rows.iter().filter_map(|r| text(r, "name")).collect::<Vec<_>>(),
        ["one", "two", "three", "four", "five"]
    );

    // Insert from a select
    executor
        .execute(Insert::select(
            copy.clone(),
            Select::from(&source)
                .columns([&id, &name])
                .filter(Specification::more_than("id", 3)),
        ))
        .await
        .expect("Failed to copy the rows");
    let rows = fetch(executor, Select::from(&copy).order_by(&id, Direction::Desc)).await;
    assert_eq!(
        rows.iter().filter_map(|r| text(r, "name")).collect::<Vec<_>>(),
        ["five", "four"]
    );

    // Values must follow the column list
    let mismatch = MultipleInsert::into(copy.clone(), [id.clone(), name.clone()])
        .add(Row::default().with("id", 6));
    let result = crate::silent_logs! { executor.execute(mismatch).await };
    assert!(
        result.is_err(),
        "A row with fewer values than columns must fail"
    );
}
