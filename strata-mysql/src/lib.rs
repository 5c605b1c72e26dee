mod connection;
mod statement;
mod value_wrap;

pub use connection::*;
pub use statement::*;
pub(crate) use value_wrap::*;

use strata_core::{DriverError, Error};

/// Wrap a client failure, with the details the server reported in front.
pub(crate) fn driver_error(error: mysql_async::Error) -> Error {
    let details = match &error {
        mysql_async::Error::Server(e) => DriverError {
            sqlstate: e.state.clone(),
            code: Some(e.code as i64),
            message: Some(e.message.clone()),
        },
        e => DriverError::general(e.to_string()),
    };
    Error::new(error).context(details)
}
