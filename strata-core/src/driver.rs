use crate::{MySqlWriter, PostgresWriter, SqlWriter, SqliteWriter};
use std::fmt::{self, Display};

/// SQL dialect a statement is rendered for.
///
/// The driver is always passed explicitly to `sql()` / `normalize()`, the same builder can be
/// rendered for every dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    MySql,
    Postgres,
    Sqlite,
}

impl Driver {
    pub const ALL: [Driver; 3] = [Driver::MySql, Driver::Postgres, Driver::Sqlite];

    /// Resolve a DSN scheme.
    pub fn from_scheme(scheme: &str) -> Option<Driver> {
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Driver::MySql),
            "postgres" | "postgresql" | "pgsql" => Some(Driver::Postgres),
            "sqlite" => Some(Driver::Sqlite),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Driver::MySql => "mysql",
            Driver::Postgres => "postgres",
            Driver::Sqlite => "sqlite",
        }
    }

    /// Dialect printer for this driver.
    pub fn sql_writer(&self) -> &'static dyn SqlWriter {
        static MYSQL: MySqlWriter = MySqlWriter::new();
        static POSTGRES: PostgresWriter = PostgresWriter::new();
        static SQLITE: SqliteWriter = SqliteWriter::new();
        match self {
            Driver::MySql => &MYSQL,
            Driver::Postgres => &POSTGRES,
            Driver::Sqlite => &SQLITE,
        }
    }

    /// Quote an identifier: backticks for MySQL, double quotes otherwise.
    pub fn escape_identifier(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 2);
        let mut context = Default::default();
        self.sql_writer()
            .write_identifier_quoted(&mut context, &mut out, name);
        out
    }
}

impl Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
