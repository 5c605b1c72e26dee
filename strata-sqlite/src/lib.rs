mod cbox;
mod connection;
mod cursor;
mod extract;
mod statement;

pub(crate) use cbox::*;
pub use connection::*;
pub use cursor::*;
pub use statement::*;

use libsqlite3_sys::{
    SQLITE_CONSTRAINT, SQLITE_MISMATCH, SQLITE_RANGE, SQLITE_TOOBIG, sqlite3, sqlite3_errcode,
    sqlite3_errmsg,
};
use std::{ffi::CStr, os::raw::c_char, ptr};
use strata_core::DriverError;

pub(crate) fn error_message_from_ptr(ptr: &'_ *const c_char) -> &'_ str {
    unsafe {
        if *ptr != ptr::null() {
            CStr::from_ptr(*ptr)
                .to_str()
                .unwrap_or("Unknown error (the error message was not a valid C string)")
        } else {
            "Unknown error (could not extract the error message)"
        }
    }
}

/// Closest SQLSTATE of a primary sqlite result code.
pub(crate) fn sqlstate(code: i32) -> &'static str {
    match code & 0xff {
        SQLITE_CONSTRAINT => "23000",
        SQLITE_MISMATCH => DriverError::INVALID_CAST,
        SQLITE_RANGE => "07009",
        SQLITE_TOOBIG => "22001",
        _ => DriverError::GENERAL,
    }
}

/// Details of the last failure reported on `db`.
pub(crate) fn driver_error(db: *mut sqlite3) -> DriverError {
    unsafe {
        let code = sqlite3_errcode(db);
        DriverError::new(
            sqlstate(code),
            Some(code as i64),
            error_message_from_ptr(&sqlite3_errmsg(db)),
        )
    }
}
