mod column;
mod column_type;
mod connection;
mod decorator;
mod driver;
mod dsn;
mod error;
mod executor;
mod native;
mod parameter;
mod query;
mod row;
mod rows;
mod specification;
mod table_name;
mod util;
mod value;
mod where_clause;
mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use column::*;
pub use column_type::*;
pub use connection::*;
pub use decorator::*;
pub use driver::*;
pub use dsn::*;
pub use error::*;
pub use executor::*;
pub use native::*;
pub use parameter::*;
pub use query::*;
pub use row::*;
pub use rows::*;
pub use specification::*;
pub use table_name::*;
pub use util::*;
pub use value::*;
pub use where_clause::*;
pub use writer::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T, E = Error> = std::result::Result<T, E>;
pub type Error = anyhow::Error;
