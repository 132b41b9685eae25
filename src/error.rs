//! Audit errors
//!
//! Malformed provider data is reported per item and skipped by the callers;
//! API failures and timeouts abort the stage they happen in.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while enumerating zones or collecting records
#[derive(Debug, Error)]
pub enum AuditError {
    /// Provider identifier does not have the expected shape
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// Provider API or transport failure
    #[error("{operation} failed: {source}")]
    Api {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A truncated page arrived without the token needed to resume
    #[error("{0} response is truncated but carries no continuation token")]
    MissingContinuation(&'static str),

    /// A provider call exceeded the configured deadline
    #[error("{operation} timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },
}

impl AuditError {
    /// Wrap any provider-side error as an API failure
    pub fn api<E>(operation: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AuditError::Api {
            operation,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
