use crate::ValueHolder;
use std::error::Error as StdError;
use strata_core::{DriverError, Error, Result, Row, RowNames};

/// Wrap a client failure, with the details the server reported in front.
pub(crate) fn driver_error(error: tokio_postgres::Error) -> Error {
    let details = if let Some(db) = error.as_db_error() {
        DriverError {
            sqlstate: db.code().code().into(),
            code: None,
            message: Some(db.message().into()),
        }
    } else {
        let mut source = error.source();
        let mut found = None;
        while let Some(e) = source {
            if let Some(details) = e.downcast_ref::<DriverError>() {
                found = Some(details.clone());
                break;
            }
            source = e.source();
        }
        found.unwrap_or_else(|| DriverError::general(error.to_string()))
    };
    Error::new(error).context(details)
}

pub(crate) fn row_to_strata_row(labels: &RowNames, row: tokio_postgres::Row) -> Result<Row> {
    let values = (0..row.len())
        .map(|i| match row.try_get::<_, ValueHolder>(i) {
            Ok(v) => Ok(v.0),
            Err(e) => {
                let col = &row.columns()[i];
                Err(Error::new(e).context(format!(
                    "Could not deserialize column {} `{}`: {}",
                    i,
                    col.name(),
                    col.type_()
                )))
            }
        })
        .collect::<Result<Box<[_]>>>()?;
    Ok(Row::new(labels.clone(), values))
}
