use crate::{CBox, SqliteCursor, SqliteStatement, driver_error};
use futures::StreamExt;
use libsqlite3_sys::*;
use std::{
    ffi::{CString, c_char, c_int},
    ptr,
    sync::Arc,
};
use strata_core::{
    Connection, Cursor, Driver, Dsn, Error, ErrorContext, NativeHandle, Result, SqlWriter,
    truncate_long,
};
use tokio::task::spawn_blocking;

/// Milliseconds a statement waits on a database locked by another connection.
pub const DEFAULT_BUSY_TIMEOUT: c_int = 5000;

/// Open sqlite database.
pub struct SqliteHandle {
    pub(crate) connection: Arc<CBox<*mut sqlite3>>,
}

/// Open the database of a `sqlite://` url and wrap it in a connection.
///
/// `sqlite://:memory:` opens a private in-memory database. `busy_timeout` sets how many milliseconds
/// to wait on a locked database, other url options such as `mode=ro` are handed to sqlite as uri
/// parameters.
pub async fn connect(url: &str) -> Result<Connection<SqliteHandle>> {
    Ok(Connection::new(SqliteHandle::open(url).await?))
}

impl SqliteHandle {
    pub async fn open(url: &str) -> Result<SqliteHandle> {
        let context = || format!("While opening the database `{}`", truncate_long!(url));
        let mut dsn = Dsn::parse(url)?;
        if dsn.driver != Driver::Sqlite {
            return Err(Error::msg(format!(
                "Expected a sqlite connection url, found a {} one",
                dsn.driver
            ))
            .context(context()));
        }
        if let Some(charset) = &dsn.charset {
            log::warn!(
                "Ignoring charset `{}`: the encoding of a sqlite database is fixed when it's created",
                charset
            );
        }
        let busy_timeout = match dsn.take_option("busy_timeout") {
            Some(v) => v
                .parse::<c_int>()
                .with_context(|| format!("Invalid busy_timeout `{}`", v))
                .with_context(context)?,
            None => DEFAULT_BUSY_TIMEOUT,
        };
        let filename = CString::new(Self::filename(&dsn)).with_context(context)?;
        let connection = spawn_blocking(move || unsafe {
            let mut connection = CBox::new(ptr::null_mut(), |p| {
                sqlite3_close(p);
            });
            let rc = sqlite3_open_v2(
                filename.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_URI | SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_FULLMUTEX,
                ptr::null(),
            );
            if rc != SQLITE_OK {
                let error = if connection.is_null() {
                    Error::msg("Out of memory while opening the database")
                } else {
                    driver_error(*connection).into()
                };
                return Err(error);
            }
            sqlite3_busy_timeout(*connection, busy_timeout);
            Ok(connection)
        })
        .await
        .with_context(context)?
        .with_context(context)?;
        Ok(Self {
            connection: Arc::new(connection),
        })
    }

    fn filename(dsn: &Dsn) -> String {
        let path = dsn.database.as_deref().unwrap_or(":memory:");
        if dsn.options.is_empty() {
            return path.to_string();
        }
        let query = dsn
            .options
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!(
            "file:{}?{}",
            path.replace('%', "%25").replace('?', "%3f").replace('#', "%23"),
            query
        )
    }

    async fn exec(&mut self, write: fn(&dyn SqlWriter, &mut String)) -> Result<()> {
        let mut sql = String::new();
        write(Driver::Sqlite.sql_writer(), &mut sql);
        let statement = self.prepare(&sql).await?;
        let mut cursor = self.run(statement).await?;
        while let Some(row) = cursor.next().await {
            row?;
        }
        Ok(())
    }
}

impl NativeHandle for SqliteHandle {
    type Statement = SqliteStatement;

    fn driver(&self) -> Driver {
        Driver::Sqlite
    }

    async fn prepare(&mut self, sql: &str) -> Result<SqliteStatement> {
        let connection = self.connection.clone();
        let sql = sql.to_string();
        spawn_blocking(move || unsafe {
            let mut statement = CBox::new(ptr::null_mut(), |p| {
                sqlite3_finalize(p);
            });
            let mut tail: *const c_char = ptr::null();
            let rc = sqlite3_prepare_v2(
                **connection,
                sql.as_ptr() as *const c_char,
                sql.len() as c_int,
                &mut *statement,
                &mut tail,
            );
            if rc != SQLITE_OK {
                return Err(driver_error(**connection).into());
            }
            if !tail.is_null() {
                let consumed = tail.offset_from(sql.as_ptr() as *const c_char) as usize;
                let rest = sql.get(consumed..).unwrap_or_default();
                if !rest.trim_matches(|c: char| c.is_whitespace() || c == ';').is_empty() {
                    return Err(Error::msg("Cannot prepare more than one statement at a time"));
                }
            }
            Ok(SqliteStatement::new(statement, connection))
        })
        .await?
    }

    async fn run(&mut self, statement: SqliteStatement) -> Result<Cursor> {
        let SqliteStatement {
            statement,
            connection,
        } = statement;
        let cursor = spawn_blocking(move || SqliteCursor::new(statement, connection)).await??;
        Ok(cursor.boxed())
    }

    async fn begin(&mut self) -> Result<()> {
        self.exec(|w, out| w.write_transaction_begin(out)).await
    }

    async fn commit(&mut self) -> Result<()> {
        self.exec(|w, out| w.write_transaction_commit(out)).await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.exec(|w, out| w.write_transaction_rollback(out)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_filename() {
        let dsn = Dsn::parse("sqlite:///tmp/data.db").unwrap();
        assert_eq!(SqliteHandle::filename(&dsn), "/tmp/data.db");
        let dsn = Dsn::parse("sqlite://data.db?mode=rwc&cache=shared").unwrap();
        assert_eq!(
            SqliteHandle::filename(&dsn),
            "file:data.db?mode=rwc&cache=shared"
        );
        let dsn = Dsn::parse("sqlite://:memory:").unwrap();
        assert_eq!(SqliteHandle::filename(&dsn), ":memory:");
    }
}
