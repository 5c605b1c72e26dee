use crate::bind_value;
use mysql_async::{Params, Statement};
use std::{
    collections::HashMap,
    fmt::{self, Display},
    mem,
};
use strata_core::{BindValue, DriverError, NativeStatement, Result};

/// Statement prepared by the server, with its parameters as bound so far.
///
/// Takes either `?` placeholders bound by position or `:name` placeholders bound by name.
#[derive(Debug)]
pub struct MySqlStatement {
    pub(crate) statement: Statement,
    names: Vec<Vec<u8>>,
    positional: Vec<Option<mysql_async::Value>>,
    named: HashMap<Vec<u8>, mysql_async::Value>,
}

impl MySqlStatement {
    pub(crate) fn new(statement: Statement, sql: &str) -> Self {
        let names = named_parameters(sql);
        let positional = if names.is_empty() {
            vec![None; statement.num_params() as usize]
        } else {
            Vec::new()
        };
        Self {
            statement,
            names,
            positional,
            named: HashMap::new(),
        }
    }

    pub(crate) fn take_params(&mut self) -> Result<Params> {
        if !self.names.is_empty() {
            return Ok(Params::Named(mem::take(&mut self.named)));
        }
        if self.positional.is_empty() {
            return Ok(Params::Empty);
        }
        let params = mem::take(&mut self.positional)
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.ok_or_else(|| {
                    DriverError::new("07002", None, format!("The parameter {} was not set", i + 1))
                        .into()
                })
            })
            .collect::<Result<_>>()?;
        Ok(Params::Positional(params))
    }
}

impl NativeStatement for MySqlStatement {
    fn bind_index(&mut self, index: u64, value: BindValue) -> Result<&mut Self> {
        let count = self.positional.len();
        let Some(param) = (index as usize)
            .checked_sub(1)
            .and_then(|i| self.positional.get_mut(i))
        else {
            return Err(DriverError::new(
                "07009",
                None,
                format!(
                    "Cannot bind parameter {}, the statement takes {} positional parameters",
                    index, count
                ),
            )
            .into());
        };
        *param = Some(bind_value(value));
        Ok(self)
    }

    fn bind_name(&mut self, name: &str, value: BindValue) -> Result<&mut Self> {
        let name = name.trim_start_matches(':').as_bytes().to_vec();
        if !self.names.contains(&name) {
            return Err(DriverError::new(
                "07009",
                None,
                format!(
                    "The statement has no parameter named `:{}`",
                    String::from_utf8_lossy(&name)
                ),
            )
            .into());
        }
        self.named.insert(name, bind_value(value));
        Ok(self)
    }
}

impl Display for MySqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MySqlStatement({})", self.statement.id())
    }
}

/// Names of the `:name` placeholders, skipping quoted text and comments.
fn named_parameters(sql: &str) -> Vec<Vec<u8>> {
    let sql = sql.as_bytes();
    let is_start = |c: u8| c.is_ascii_alphabetic() || c == b'_';
    let mut result: Vec<Vec<u8>> = Vec::new();
    let mut i = 0;
    while i < sql.len() {
        match sql[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < sql.len() && sql[i] != quote {
                    if sql[i] == b'\\' && quote != b'`' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'-' if sql.get(i + 1) == Some(&b'-') => {
                while i < sql.len() && sql[i] != b'\n' {
                    i += 1;
                }
            }
            b'#' => {
                while i < sql.len() && sql[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if sql.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < sql.len() && !(sql[i] == b'*' && sql.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 1;
            }
            b':' if sql.get(i + 1).is_some_and(|c| is_start(*c)) => {
                let start = i + 1;
                i = start;
                while i < sql.len() && (sql[i].is_ascii_alphanumeric() || sql[i] == b'_') {
                    i += 1;
                }
                let name = sql[start..i].to_vec();
                if !result.contains(&name) {
                    result.push(name);
                }
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::named_parameters;

    #[test]
    fn finds_named_placeholders() {
        let names = named_parameters(
            "SELECT ':quoted', `:ident` -- :comment\n FROM t WHERE a = :first AND b = :second_2 OR c = :first",
        );
        assert_eq!(names, [b"first".to_vec(), b"second_2".to_vec()]);
        assert!(named_parameters("SELECT ? + ?").is_empty());
        assert!(named_parameters("SELECT '\\':x'").is_empty());
    }
}
