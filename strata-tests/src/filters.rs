use crate::{column, fetch, int, table};
use strata::{
    Column, ColumnName, ColumnType, CreateTable, Direction, DropTable, Executor, MultipleInsert,
    Row, Select, Specification, Value,
};

async fn ids<E: Executor>(executor: &mut E, select: Select) -> Vec<i64> {
    fetch(executor, select.order_by(column("id"), Direction::Asc))
        .await
        .iter()
        .filter_map(|r| int(r, "id"))
        .collect()
}

pub async fn filters<E: Executor>(executor: &mut E) {
    let people = table("strata_people");

    // Setup
    executor
        .execute(DropTable::if_exists(people.clone()))
        .await
        .expect("Failed to drop strata_people");
    executor
        .execute(
            CreateTable::named(
                people.clone(),
                [
                    Column::new(column("id"), ColumnType::int()),
                    Column::new(column("name"), ColumnType::varchar(32)),
                    Column::new(column("age"), ColumnType::int().nullable()),
                ],
            )
            .primary_key(column("id")),
        )
        .await
        .expect("Failed to create strata_people");
    let insert = [
        (1, "alice", Value::Int(30)),
        (2, "bob", Value::Null),
        (3, "carol", Value::Int(25)),
        (4, "alfred", Value::Int(40)),
    ]
    .into_iter()
    .fold(
        MultipleInsert::into(people.clone(), ["id", "name", "age"].map(column)),
        |insert, (id, name, age)| {
            insert.add(
                Row::default()
                    .with("id", id)
                    .with("name", name)
                    .with("age", age),
            )
        },
    );
    executor
        .execute(insert)
        .await
        .expect("Failed to insert the people");
    let all = || Select::from(&people);

    // Patterns
    assert_eq!(
        ids(executor, all().filter(Specification::starts_with("name", "al"))).await,
        [1, 4]
    );
    assert_eq!(
        ids(executor, all().filter(Specification::ends_with("name", "ol"))).await,
        [3]
    );
    assert_eq!(
        ids(executor, all().filter(Specification::contains("name", "ob"))).await,
        [2]
    );

    // Membership and nulls
    assert_eq!(
        ids(executor, all().filter(Specification::is_in("id", [3, 1]))).await,
        [1, 3]
    );
    assert_eq!(
        ids(executor, all().filter(Specification::is_null("age"))).await,
        [2]
    );
    assert_eq!(
        ids(executor, all().filter(Specification::is_not_null("age"))).await,
        [1, 3, 4]
    );

    // Comparisons and composition
    assert_eq!(
        ids(
            executor,
            all().filter(
                Specification::more_than("age", 25)
                    .and(Specification::less_than_or_equal("age", 40))
            )
        )
        .await,
        [1, 4]
    );
    assert_eq!(
        ids(
            executor,
            all().filter(
                Specification::equality("id", 1)
                    .or(Specification::equality("id", 2))
                    .not()
            )
        )
        .await,
        [3, 4]
    );
    assert_eq!(
        ids(executor, all().filter(Specification::inequality("name", "bob"))).await,
        [1, 3, 4]
    );
    assert_eq!(
        ids(
            executor,
            all().filter(
                Specification::less_than("age", 30)
                    .or(Specification::more_than_or_equal("age", 40))
            )
        )
        .await,
        [3, 4]
    );
    let qualified = format!("{}.name", people.as_str());
    assert_eq!(
        ids(executor, all().filter(Specification::equality(qualified, "carol"))).await,
        [3]
    );

    // Paging
    assert_eq!(ids(executor, all().limit(2).offset(1)).await, [2, 3]);
    assert_eq!(ids(executor, all().limit(1)).await, [1]);

    // Count
    let total = ColumnName::new("total").expect("Invalid alias");
    let rows = fetch(
        executor,
        all()
            .count(total)
            .filter(Specification::more_than_or_equal("age", 30)),
    )
    .await;
    assert_eq!(rows.len(), 1);
    assert_eq!(int(&rows[0], "total"), Some(2));
}
