use crate::{Normalized, Query, truncate_long};
use std::fmt::Display;
use thiserror::Error;

/// Invalid model value, raised when the value is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("A {0} name cannot be empty")]
    EmptyName(&'static str),
    #[error("Decimal scale {scale} cannot exceed its precision {precision}")]
    DecimalScale { precision: u32, scale: u32 },
}

/// Failure details reported by a database backend.
///
/// Native handles put this value in the `anyhow` chain, the executor lifts it into [`QueryFailed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "SQLSTATE[{sqlstate}]{}{}",
    enclosed(" (", .code, ")"),
    enclosed(": ", .message, "")
)]
pub struct DriverError {
    /// SQLSTATE, or its closest equivalent.
    pub sqlstate: String,
    /// Backend specific numeric code.
    pub code: Option<i64>,
    /// Backend specific message.
    pub message: Option<String>,
}

impl DriverError {
    pub const GENERAL: &'static str = "HY000";
    pub const INVALID_CAST: &'static str = "22018";
    pub const INVALID_TRANSACTION_STATE: &'static str = "25000";

    pub fn new(sqlstate: impl Into<String>, code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            sqlstate: sqlstate.into(),
            code,
            message: Some(message.into()),
        }
    }
    pub fn general(message: impl Into<String>) -> Self {
        Self::new(Self::GENERAL, None, message)
    }
}

fn enclosed<T: Display>(prefix: &str, value: &Option<T>, suffix: &str) -> String {
    value
        .as_ref()
        .map(|v| format!("{prefix}{v}{suffix}"))
        .unwrap_or_default()
}

fn excerpt(normalized: &Normalized) -> String {
    truncate_long!(normalized.sql).to_string()
}

/// The only failure surfaced by an executor.
#[derive(Debug, Error)]
#[error("{details}\nWhile executing the query:\n{}", excerpt(.normalized))]
pub struct QueryFailed {
    /// The query as it was handed to the executor.
    pub query: Box<Query>,
    /// The statement that failed, as sent to the backend.
    pub normalized: Normalized,
    pub details: DriverError,
    #[source]
    pub cause: anyhow::Error,
}

impl QueryFailed {
    pub fn new(query: &Query, normalized: &Normalized, cause: anyhow::Error) -> Self {
        let details = cause
            .downcast_ref::<DriverError>()
            .or_else(|| cause.chain().find_map(|e| e.downcast_ref::<DriverError>()))
            .cloned()
            .unwrap_or_else(|| DriverError {
                sqlstate: DriverError::GENERAL.into(),
                code: None,
                message: Some(cause.to_string()),
            });
        Self {
            query: Box::new(query.clone()),
            normalized: normalized.clone(),
            details,
            cause,
        }
    }
    pub fn sqlstate(&self) -> &str {
        &self.details.sqlstate
    }
    pub fn code(&self) -> Option<i64> {
        self.details.code
    }
    pub fn message(&self) -> Option<&str> {
        self.details.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builder, Commit, ErrorContext, Sql};

    #[test]
    fn query_failed_lifts_driver_details() {
        let query: Query = Sql::of("SELECT broken").into();
        let normalized = query.normalize(crate::Driver::Sqlite);
        let cause = anyhow::Error::new(DriverError::new("42S02", Some(1), "no such table"))
            .context("While preparing the query");
        let failure = QueryFailed::new(&query, &normalized, cause);
        assert_eq!(failure.sqlstate(), "42S02");
        assert_eq!(failure.code(), Some(1));
        assert_eq!(failure.message(), Some("no such table"));
        assert_eq!(failure.normalized.sql, "SELECT broken");
        assert!(std::error::Error::source(&failure).is_some());
    }

    #[test]
    fn query_failed_without_details_is_general() {
        let query: Query = Commit.into();
        let normalized = query.normalize(crate::Driver::MySql);
        let failure = QueryFailed::new(
            &query,
            &normalized,
            Err::<(), _>(anyhow::Error::msg("socket closed"))
                .context("While committing")
                .unwrap_err(),
        );
        assert_eq!(failure.sqlstate(), "HY000");
        assert_eq!(failure.code(), None);
        assert_eq!(failure.message(), Some("While committing"));
    }

    #[test]
    fn failure_messages() {
        let details = DriverError::new("42S02", Some(1), "no such table");
        assert_eq!(details.to_string(), "SQLSTATE[42S02] (1): no such table");
        assert_eq!(
            DriverError::general("connection busy").to_string(),
            "SQLSTATE[HY000]: connection busy"
        );
        let bare = DriverError {
            sqlstate: "23000".into(),
            code: None,
            message: None,
        };
        assert_eq!(bare.to_string(), "SQLSTATE[23000]");

        let query: Query = Sql::of("SELECT broken").into();
        let normalized = query.normalize(crate::Driver::Postgres);
        let failure = QueryFailed::new(&query, &normalized, anyhow::Error::new(details));
        assert_eq!(
            failure.to_string(),
            "SQLSTATE[42S02] (1): no such table\nWhile executing the query:\nSELECT broken"
        );
        let source = std::error::Error::source(&failure).expect("The cause is the source");
        assert_eq!(source.to_string(), "SQLSTATE[42S02] (1): no such table");
    }
}
