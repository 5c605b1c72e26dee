use crate::{column, fetch, int, table, text};
use strata::{
    Column, ColumnType, CreateTable, Delete, DropTable, Executor, Insert, Row, Select,
    Specification, Update, Value,
};

pub async fn round_trip<E: Executor>(executor: &mut E) {
    let items = table("strata_round_trip");
    let id = column("id");
    let n = column("n");

    // Setup
    executor
        .execute(DropTable::if_exists(items.clone()))
        .await
        .expect("Failed to drop strata_round_trip");
    executor
        .execute(
            CreateTable::named(
                items.clone(),
                [
                    Column::new(id.clone(), ColumnType::varchar(64)),
                    Column::new(n.clone(), ColumnType::int().nullable()),
                ],
            )
            .primary_key(id.clone()),
        )
        .await
        .expect("Failed to create strata_round_trip");

    // Insert then select everything
    let rows = fetch(
        executor,
        Insert::into(items.clone(), Row::default().with("id", "u1").with("n", 42)),
    )
    .await;
    assert!(rows.is_empty(), "An insert does not return rows");
    let rows = fetch(executor, Select::from(&items)).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].names(), ["id", "n"]);
    assert_eq!(text(&rows[0], "id"), Some("u1"));
    assert_eq!(int(&rows[0], "n"), Some(42));

    // Select by primary key
    executor
        .execute(Insert::into(
            items.clone(),
            Row::default().with("id", "u2").with("n", Value::Null),
        ))
        .await
        .expect("Failed to insert u2");
    let rows = fetch(
        executor,
        Select::from(&items).filter(Specification::equality("id", "u2")),
    )
    .await;
    assert_eq!(rows.len(), 1);
    assert_eq!(text(&rows[0], "id"), Some("u2"));
    assert_eq!(rows[0].column("n"), Some(&Value::Null));

    // Update
    executor
        .execute(
            Update::set(items.clone(), Row::default().with("n", 7))
                .filter(Specification::equality("id", "u2")),
        )
        .await
        .expect("Failed to update u2");
    let rows = fetch(
        executor,
        Select::from(&items)
            .column(&n)
            .filter(Specification::equality("id", "u2")),
    )
    .await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].names(), ["n"]);
    assert_eq!(int(&rows[0], "n"), Some(7));
    let rows = fetch(
        executor,
        Select::from(&items).filter(Specification::equality("id", "u1")),
    )
    .await;
    assert_eq!(int(&rows[0], "n"), Some(42), "Other rows are untouched");

    // Delete
    executor
        .execute(Delete::from(&items).filter(Specification::equality("id", "u2")))
        .await
        .expect("Failed to delete u2");
    let rows = fetch(executor, Select::from(&items)).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(text(&rows[0], "id"), Some("u1"));
    executor
        .execute(Delete::from(&items))
        .await
        .expect("Failed to clear strata_round_trip");
    assert!(fetch(executor, Select::from(&items)).await.is_empty());
}
