mod connection;
mod statement;
mod util;
mod value_holder;

pub use connection::*;
pub use statement::*;
pub(crate) use util::*;
pub(crate) use value_holder::*;
