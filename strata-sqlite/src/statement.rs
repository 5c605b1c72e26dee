use crate::{CBox, driver_error};
use libsqlite3_sys::*;
use std::{
    ffi::{CString, c_int},
    fmt::{self, Display},
    os::raw::c_char,
    sync::Arc,
};
use strata_core::{BindValue, DriverError, ErrorContext, NativeStatement, Result};

/// Prepared statement waiting for its parameters.
pub struct SqliteStatement {
    pub(crate) statement: CBox<*mut sqlite3_stmt>,
    // Keeps the database open while the statement lives.
    pub(crate) connection: Arc<CBox<*mut sqlite3>>,
}

impl SqliteStatement {
    pub(crate) fn new(statement: CBox<*mut sqlite3_stmt>, connection: Arc<CBox<*mut sqlite3>>) -> Self {
        if !statement.is_null() {
            unsafe {
                sqlite3_clear_bindings(*statement);
            }
        }
        Self {
            statement,
            connection,
        }
    }

    /// Number of placeholders in the statement.
    pub fn parameter_count(&self) -> usize {
        if self.statement.is_null() {
            return 0;
        }
        unsafe { sqlite3_bind_parameter_count(*self.statement) as usize }
    }

    fn bind_at(&mut self, index: c_int, value: BindValue) -> Result<&mut Self> {
        if self.statement.is_null() {
            return Err(DriverError::new("07009", None, "The statement has no parameters").into());
        }
        let rc = unsafe {
            match &value {
                BindValue::Null => sqlite3_bind_null(*self.statement, index),
                BindValue::Bool(v) => sqlite3_bind_int(*self.statement, index, *v as c_int),
                BindValue::Int(v) => sqlite3_bind_int64(*self.statement, index, *v),
                BindValue::Text(v) => sqlite3_bind_text(
                    *self.statement,
                    index,
                    v.as_ptr() as *const c_char,
                    v.len() as c_int,
                    SQLITE_TRANSIENT(),
                ),
            }
        };
        if rc != SQLITE_OK {
            let error = driver_error(**self.connection);
            return Err(error).with_context(|| format!("Cannot bind {:?} at index {}", value, index));
        }
        Ok(self)
    }
}

impl NativeStatement for SqliteStatement {
    fn bind_index(&mut self, index: u64, value: BindValue) -> Result<&mut Self> {
        self.bind_at(index as c_int, value)
    }

    fn bind_name(&mut self, name: &str, value: BindValue) -> Result<&mut Self> {
        let name = if name.starts_with([':', '@', '$']) {
            name.to_string()
        } else {
            format!(":{}", name)
        };
        let c_name = CString::new(name.as_str())
            .with_context(|| format!("Invalid parameter name `{}`", name))?;
        let index = if self.statement.is_null() {
            0
        } else {
            unsafe { sqlite3_bind_parameter_index(*self.statement, c_name.as_ptr()) }
        };
        if index == 0 {
            return Err(DriverError::new(
                "07009",
                None,
                format!("The statement has no parameter named `{}`", name),
            )
            .into());
        }
        self.bind_at(index, value)
    }
}

impl Display for SqliteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:p}", *self.statement)
    }
}
