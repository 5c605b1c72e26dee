use crate::{column, fetch, silent_logs, table};
use strata::{
    Column, ColumnType, CreateTable, DropTable, Executor, Insert, Row, Select, Unique,
};

pub async fn create_table<E: Executor>(executor: &mut E) {
    let products = table("strata_products");
    let id = column("id");
    let code = column("code");
    let price = column("price");
    let label = column("label");
    let columns = [
        Column::new(id.clone(), ColumnType::bigint()),
        Column::new(code.clone(), ColumnType::varchar(16).comment("Stock keeping unit")),
        Column::new(
            price.clone(),
            ColumnType::decimal(10, 2).expect("Invalid decimal"),
        ),
        Column::new(
            label.clone(),
            ColumnType::varchar(32).nullable().default("unnamed"),
        ),
    ];

    // Setup
    executor
        .execute(DropTable::if_exists(products.clone()))
        .await
        .expect("Failed to drop strata_products");

    // Idempotent creation
    let create = CreateTable::if_not_exists(products.clone(), columns.clone())
        .primary_key(id.clone())
        .constraint(Unique::of([code.clone()]).named("strata_products_code"));
    for _ in 0..2 {
        let rows = fetch(executor, create.clone()).await;
        assert!(rows.is_empty(), "Creating a table returns no rows");
    }

    // Plain creation of an existing table
    let result = silent_logs! {
        executor
            .execute(CreateTable::named(products.clone(), columns.clone()))
            .await
    };
    assert!(
        result.is_err(),
        "Creating an existing table without IF NOT EXISTS must fail"
    );

    // Defaults and constraints are in place
    executor
        .execute(Insert::into(
            products.clone(),
            Row::default()
                .with("id", 1)
                .with("code", "A-1")
                .with("price", "9.90"),
        ))
        .await
        .expect("Failed to insert a product");
    let rows = fetch(executor, Select::from(&products).column(&label)).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].column("label").and_then(|v| v.as_str()),
        Some("unnamed")
    );
    let failure = silent_logs! {
        executor
            .execute(Insert::into(
                products.clone(),
                Row::default()
                    .with("id", 2)
                    .with("code", "A-1")
                    .with("price", "1.00"),
            ))
            .await
            .expect_err("A duplicate unique value must be rejected")
    };
    assert!(
        failure.sqlstate().starts_with("23"),
        "Unexpected SQLSTATE {}",
        failure.sqlstate()
    );

    // Drop
    executor
        .execute(DropTable::named(products.clone()))
        .await
        .expect("Failed to drop strata_products");
    let result = silent_logs! {
        executor.execute(DropTable::named(products.clone())).await
    };
    assert!(result.is_err(), "Dropping a missing table must fail");
    executor
        .execute(DropTable::if_exists(products.clone()))
        .await
        .expect("Dropping a missing table with IF EXISTS must succeed");
}
