//! The unified error type for the engine.
//!
//! Every failure a caller can see falls into one of four buckets:
//!
//! - [`TabularError::Io`] for anything the filesystem throws back
//! - [`TabularError::Schema`] for declared-column violations
//! - [`TabularError::Bounds`] for row positions with no backing row
//! - [`TabularError::Argument`] for malformed configuration calls

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabularError {
    /// File open/read/write/seek failures. Fatal to the call, never retried.
    #[error("io failure: {message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Duplicate column names on declaration, or a row whose width does not
    /// match the declared columns.
    #[error("schema violation: {0}")]
    Schema(String),

    /// A row position that has no backing record.
    #[error("position {0} is out of bounds")]
    Bounds(isize),

    /// Join/merge column lists that are malformed, reference undeclared
    /// columns, or an operation the storage mode does not support.
    #[error("invalid argument: {0}")]
    Argument(String),
}

impl TabularError {
    pub fn io(message: impl Into<String>, source: io::Error) -> TabularError {
        TabularError::Io {
            message: message.into(),
            source,
        }
    }

    pub fn schema(message: impl Into<String>) -> TabularError {
        TabularError::Schema(message.into())
    }

    pub fn argument(message: impl Into<String>) -> TabularError {
        TabularError::Argument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TabularError>;
