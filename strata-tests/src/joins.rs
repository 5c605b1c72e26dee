use crate::{column, fetch, int, table, text};
use strata::{
    Column, ColumnType, CreateTable, Direction, DropTable, Executor, Insert, Join,
    ParameterType, Row, Select, Specification, TypedValue, Value,
};

pub async fn joins<E: Executor>(executor: &mut E) {
    let authors = table("strata_authors");
    let books = table("strata_books");
    let id = column("id");
    let name = column("name");
    let author_id = column("author_id");
    let title = column("title");

    // Setup
    for table in [&books, &authors] {
        executor
            .execute(DropTable::if_exists(table.clone()))
            .await
            .expect("Failed to drop the table");
    }
    executor
        .execute(
            CreateTable::named(
                authors.clone(),
                [
                    Column::new(id.clone(), ColumnType::int()),
                    Column::new(name.clone(), ColumnType::varchar(32)),
                ],
            )
            .primary_key(id.clone()),
        )
        .await
        .expect("Failed to create strata_authors");
    executor
        .execute(
            CreateTable::named(
                books.clone(),
                [
                    Column::new(id.clone(), ColumnType::int()),
                    Column::new(author_id.clone(), ColumnType::int().nullable()),
                    Column::new(title.clone(), ColumnType::varchar(64)),
                ],
            )
            .primary_key(id.clone())
            .foreign_key(author_id.clone(), authors.clone(), id.clone()),
        )
        .await
        .expect("Failed to create strata_books");
    executor
        .execute(
            Insert::into(authors.clone(), Row::default().with("id", 1).with("name", "ann"))
                .and(Row::default().with("id", 2).with("name", "ben")),
        )
        .await
        .expect("Failed to insert the authors");
    executor
        .execute(
            Insert::into(
                books.clone(),
                Row::default()
                    .with("id", 10)
                    .with("author_id", 1)
                    .with("title", "a"),
            )
            .and(
                Row::default()
                    .with("id", 11)
                    .with("author_id", 1)
                    .with("title", "b"),
            )
            .and(
                Row::default()
                    .with("id", 12)
                    .with("author_id", Value::Null)
                    .with("title", "c"),
            ),
        )
        .await
        .expect("Failed to insert the books");

    // Left join through aliases
    let b = books.aliased("b").expect("Invalid alias");
    let a = authors.aliased("a").expect("Invalid alias");
    let select = Select::from(b)
        .join(Join::left(a).on(
            author_id.in_alias("b").expect("Invalid alias"),
            id.in_alias("a").expect("Invalid alias"),
        ))
        .columns([
            title
                .in_alias("b")
                .and_then(|c| c.aliased("book"))
                .expect("Invalid alias"),
            name.in_alias("a")
                .and_then(|c| c.aliased("author"))
                .expect("Invalid alias"),
        ])
        .order_by(title.in_alias("b").expect("Invalid alias"), Direction::Asc);
    let rows = fetch(executor, select.clone()).await;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].names(), ["book", "author"]);
    let pairs = rows
        .iter()
        .map(|r| (text(r, "book"), text(r, "author")))
        .collect::<Vec<_>>();
    assert_eq!(
        pairs,
        [
            (Some("a"), Some("ann")),
            (Some("b"), Some("ann")),
            (Some("c"), None)
        ]
    );
    let rows = fetch(
        executor,
        select.filter(Specification::equality("a.name", "ann")),
    )
    .await;
    assert_eq!(rows.len(), 2);

    // Literal projection, bound before the filter
    let rows = fetch(
        executor,
        Select::from(&authors)
            .column(&id)
            .column(TypedValue::new(column("kind"), "author", ParameterType::String))
            .filter(Specification::equality("id", 2)),
    )
    .await;
    assert_eq!(rows.len(), 1);
    assert_eq!(int(&rows[0], "id"), Some(2));
    assert_eq!(text(&rows[0], "kind"), Some("author"));
}
