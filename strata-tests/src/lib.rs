mod create_table;
mod failure;
mod filters;
mod interleaved;
mod joins;
mod lazy;
mod memory;
mod round_trip;
mod transactions;
mod writes;

use crate::{
    create_table::create_table, failure::failure, filters::filters, interleaved::interleaved,
    joins::joins,
    lazy::{lazy, lazy_writes},
    round_trip::round_trip, transactions::transactions, writes::writes,
};
use log::LevelFilter;
use std::env;
use strata::{ColumnName, Executor, Query, Row, TableName, stream::TryStreamExt};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub async fn execute_tests<E: Executor>(mut executor: E) {
    round_trip(&mut executor).await;
    create_table(&mut executor).await;
    writes(&mut executor).await;
    filters(&mut executor).await;
    joins(&mut executor).await;
    transactions(&mut executor).await;
    failure(&mut executor).await;
    lazy(&mut executor).await;
    lazy_writes(&mut executor).await;
    interleaved(&mut executor).await;
}

/// Mute logging while evaluating the code, to provoke failures without noise.
#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        let result = { $($code)+ };
        log::set_max_level(level);
        result
    }};
}

pub(crate) fn table(name: &str) -> TableName {
    TableName::new(name).expect("Invalid table name")
}

pub(crate) fn column(name: &str) -> ColumnName {
    ColumnName::new(name).expect("Invalid column name")
}

/// Run a query and collect all its rows.
pub(crate) async fn fetch<E, Q>(executor: &mut E, query: Q) -> Vec<Row>
where
    E: Executor,
    Q: Into<Query> + Send,
{
    let query = query.into();
    let context = format!("{:?}", query);
    executor
        .execute(query)
        .await
        .unwrap_or_else(|e| panic!("Failed to execute {}:\n{:#}", context, e))
        .try_collect()
        .await
        .unwrap_or_else(|e| panic!("Failed to fetch the rows of {}:\n{:#}", context, e))
}

/// Integer content of a column, whether the backend returned it as a number or as text.
pub(crate) fn int(row: &Row, name: &str) -> Option<i64> {
    row.column(name).and_then(|v| v.as_i64())
}

pub(crate) fn text<'r>(row: &'r Row, name: &str) -> Option<&'r str> {
    row.column(name).and_then(|v| v.as_str())
}
