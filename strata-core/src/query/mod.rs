mod create_table;
mod delete;
mod drop_table;
mod insert;
mod join;
mod multiple_insert;
mod select;
mod sql;
mod transaction;
mod update;

pub use create_table::*;
pub use delete::*;
pub use drop_table::*;
pub use insert::*;
pub use join::*;
pub use multiple_insert::*;
pub use select::*;
pub use sql::*;
pub use transaction::*;
pub use update::*;

use crate::{Driver, Parameter, writer::Context};

/// Driver specific statement: SQL text, parameters in placeholder order, lazy flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub sql: String,
    pub parameters: Vec<Parameter>,
    pub lazy: bool,
}

impl Normalized {
    pub(crate) fn from_context(sql: String, context: Context, lazy: bool) -> Self {
        Self {
            sql,
            parameters: context.parameters,
            lazy,
        }
    }

    /// Merge several statements into one `; ` separated text.
    ///
    /// Placeholders are kept as they are: statements numbering them must be rendered with the
    /// offset of the parameters that precede them.
    pub fn join(statements: Vec<Normalized>) -> Normalized {
        let lazy = statements.iter().any(|v| v.lazy);
        let mut sql = String::new();
        let mut parameters = Vec::new();
        for statement in statements {
            if !sql.is_empty() {
                sql.push_str("; ");
            }
            sql.push_str(&statement.sql);
            parameters.extend(statement.parameters);
        }
        Normalized {
            sql,
            parameters,
            lazy,
        }
    }
}

/// Anything that renders into driver specific SQL.
///
/// Rendering is pure: the same value can be normalized once per driver.
pub trait Builder {
    fn normalize(&self, driver: Driver) -> Normalized;

    /// Statements to execute one after the other, in order.
    fn statements(&self, driver: Driver) -> Vec<Normalized> {
        vec![self.normalize(driver)]
    }

    fn sql(&self, driver: Driver) -> String {
        self.normalize(driver).sql
    }

    fn parameters(&self, driver: Driver) -> Vec<Parameter> {
        self.normalize(driver).parameters
    }
}

/// Every statement an executor accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Sql(Sql),
    Select(Select),
    Insert(Insert),
    MultipleInsert(MultipleInsert),
    Update(Update),
    Delete(Delete),
    CreateTable(CreateTable),
    DropTable(DropTable),
    Transaction(Transaction),
}

impl Query {
    pub fn transaction(&self) -> Option<Transaction> {
        match self {
            Query::Transaction(transaction) => Some(*transaction),
            _ => None,
        }
    }
    fn as_builder(&self) -> &dyn Builder {
        match self {
            Query::Sql(v) => v,
            Query::Select(v) => v,
            Query::Insert(v) => v,
            Query::MultipleInsert(v) => v,
            Query::Update(v) => v,
            Query::Delete(v) => v,
            Query::CreateTable(v) => v,
            Query::DropTable(v) => v,
            Query::Transaction(v) => v,
        }
    }
}

impl Builder for Query {
    fn normalize(&self, driver: Driver) -> Normalized {
        self.as_builder().normalize(driver)
    }
    fn statements(&self, driver: Driver) -> Vec<Normalized> {
        self.as_builder().statements(driver)
    }
}

macro_rules! impl_from_for_query {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for Query {
                fn from(value: $ty) -> Self {
                    Query::$variant(value)
                }
            }
        )+
    };
}
impl_from_for_query!(
    Sql(Sql),
    Select(Select),
    Insert(Insert),
    MultipleInsert(MultipleInsert),
    Update(Update),
    Delete(Delete),
    CreateTable(CreateTable),
    DropTable(DropTable),
    Transaction(Transaction),
);

impl From<&Query> for Query {
    fn from(value: &Query) -> Self {
        value.clone()
    }
}
