use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

use crate::ingestion::observability::ImportSeverity;

/// Convenience result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Error type returned by every stage of the import pipeline.
///
/// Per-file errors are caught by the orchestrator and reported as a failed outcome;
/// only [`ImportError::Connectivity`] aborts a run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error (malformed quoting, invalid UTF-8, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The source file has zero bytes.
    #[error("empty file: {}", path.display())]
    EmptyFile { path: PathBuf },

    /// The parsed header has no columns.
    #[error("no columns to parse from file '{file}'")]
    EmptyHeader { file: String },

    /// A sanitized identifier cannot be used as a table or column name.
    #[error("invalid identifier '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: String },

    /// Two header names sanitize to the same column identifier.
    #[error("duplicate column '{column}': header names '{first}' and '{second}' collide after sanitization")]
    DuplicateColumn {
        column: String,
        first: String,
        second: String,
    },

    /// Row arity or existing table columns do not match the derived schema.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// The ledger already holds an entry for this file.
    #[error("duplicate key: '{file}' is already recorded in the import ledger")]
    DuplicateKey { file: String },

    /// The store rejected a write.
    #[error("constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Transport-level failure talking to the store.
    #[error("connectivity error: {message}")]
    Connectivity { message: String },

    /// Any other store error.
    #[error("database error: {0}")]
    Database(rusqlite::Error),
}

impl ImportError {
    /// Severity used for observer callbacks and alert thresholds.
    pub fn severity(&self) -> ImportSeverity {
        match self {
            Self::Io(_) | Self::Connectivity { .. } => ImportSeverity::Critical,
            Self::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => ImportSeverity::Critical,
                _ => ImportSeverity::Error,
            },
            _ => ImportSeverity::Error,
        }
    }

    /// Whether the error must stop the whole run instead of only the current file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    pub(crate) fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(e, _) => Some(e.code),
            _ => None,
        };
        match code {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation {
                message: err.to_string(),
            },
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::SystemIoFailure
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::NotADatabase
                | ErrorCode::DiskFull,
            ) => Self::Connectivity {
                message: err.to_string(),
            },
            _ => Self::Database(err),
        }
    }
}
