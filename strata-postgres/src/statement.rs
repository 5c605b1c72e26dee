use std::fmt::{self, Debug, Display};
use strata_core::{BindValue, DriverError, NativeStatement, Result};
use tokio_postgres::Statement;

/// Statement prepared by the server, with its parameters as bound so far.
pub struct PostgresStatement {
    pub(crate) statement: Statement,
    pub(crate) params: Vec<Option<BindValue>>,
}

impl PostgresStatement {
    pub(crate) fn new(statement: Statement) -> Self {
        let params = vec![None; statement.params().len()];
        Self { statement, params }
    }

    /// Every parameter, failing on the first one never bound.
    pub(crate) fn take_params(&mut self) -> Result<Vec<BindValue>> {
        std::mem::take(&mut self.params)
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.ok_or_else(|| {
                    DriverError::new("07002", None, format!("The parameter ${} was not set", i + 1))
                        .into()
                })
            })
            .collect()
    }
}

impl NativeStatement for PostgresStatement {
    fn bind_index(&mut self, index: u64, value: BindValue) -> Result<&mut Self> {
        let count = self.params.len();
        let Some(param) = (index as usize)
            .checked_sub(1)
            .and_then(|i| self.params.get_mut(i))
        else {
            return Err(DriverError::new(
                "07009",
                None,
                format!(
                    "Cannot bind parameter {}, the statement takes {}",
                    index, count
                ),
            )
            .into());
        };
        *param = Some(value);
        Ok(self)
    }

    fn bind_name(&mut self, name: &str, _value: BindValue) -> Result<&mut Self> {
        Err(DriverError::general(format!(
            "Cannot bind `{}`: Postgres statements take positional parameters only",
            name
        ))
        .into())
    }
}

impl Display for PostgresStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.statement.fmt(f)
    }
}
