use crate::{Builder, Driver, Normalized, Query};

/// Transaction control statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transaction {
    Start,
    Commit,
    Rollback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StartTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rollback;

impl Builder for Transaction {
    fn normalize(&self, driver: Driver) -> Normalized {
        let writer = driver.sql_writer();
        let mut sql = String::new();
        match self {
            Transaction::Start => writer.write_transaction_begin(&mut sql),
            Transaction::Commit => writer.write_transaction_commit(&mut sql),
            Transaction::Rollback => writer.write_transaction_rollback(&mut sql),
        }
        Normalized {
            sql,
            parameters: Vec::new(),
            lazy: false,
        }
    }
}

impl From<StartTransaction> for Query {
    fn from(_: StartTransaction) -> Self {
        Query::Transaction(Transaction::Start)
    }
}

impl From<Commit> for Query {
    fn from(_: Commit) -> Self {
        Query::Transaction(Transaction::Commit)
    }
}

impl From<Rollback> for Query {
    fn from(_: Rollback) -> Self {
        Query::Transaction(Transaction::Rollback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_per_driver() {
        assert_eq!(Transaction::Start.sql(Driver::MySql), "START TRANSACTION");
        assert_eq!(Transaction::Start.sql(Driver::Postgres), "BEGIN");
        assert_eq!(Transaction::Start.sql(Driver::Sqlite), "BEGIN");
        assert_eq!(Transaction::Commit.sql(Driver::Sqlite), "COMMIT");
        assert_eq!(Transaction::Rollback.sql(Driver::MySql), "ROLLBACK");
        assert_eq!(Query::from(Rollback).transaction(), Some(Transaction::Rollback));
    }
}
