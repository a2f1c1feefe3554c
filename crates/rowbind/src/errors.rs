//! Error taxonomy for the mapping engine.
//!
//! Every failure is returned to the immediate caller; nothing is swallowed
//! or retried here. `NoRows` is deliberately distinct from `Scan` so callers
//! can treat "zero matching rows" as ordinary control flow.

/// Errors produced by mapper acquisition, scanning, scalar extraction and
/// the transaction runner.
#[derive(Debug, thiserror::Error)]
pub enum DaoError {
    /// The record type declares no bindable columns; raised at mapper
    /// acquisition time.
    #[error("record type {type_name} declares no bindable columns")]
    InvalidRecordType { type_name: &'static str },

    /// The result row's shape does not match the resolved binding list;
    /// raised before any field is written.
    #[error("result shape mismatch for {type_name}: expected {expected} columns, row has {actual}")]
    TypeMismatch {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The requested tag namespace matches no declared column; raised
    /// before any I/O.
    #[error("tag {tag:?} matches no declared column of {type_name}")]
    TagResolution {
        tag: String,
        type_name: &'static str,
    },

    /// A single-row query matched zero rows.
    #[error("query matched no rows")]
    NoRows,

    /// A column value could not be converted into its destination field.
    #[error("failed to scan column {column:?}: {message}")]
    Scan { column: String, message: String },

    /// The row cursor reported a terminal error during iteration.
    #[error("row cursor failed during iteration: {message}")]
    Cursor { message: String },

    /// A statement execution (INSERT/UPDATE/DELETE/DDL) failed.
    #[error("statement execution failed: {message}")]
    Exec { message: String },

    /// The driver failed outside of scanning or statement execution
    /// (prepare, pragma, protocol errors).
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("failed to begin transaction: {message}")]
    Begin { message: String },

    #[error("failed to commit transaction: {message}")]
    Commit { message: String },

    /// Rollback failure. Always secondary: the failure that triggered the
    /// rollback is what propagates to the caller, this one is logged.
    #[error("failed to roll back transaction: {message}")]
    Rollback { message: String },

    /// The count helper was given a condition that is not a select.
    #[error("not a select condition")]
    NotASelectCondition,

    /// The execution context was cancelled before or during the operation.
    #[error("operation cancelled")]
    Cancelled,
}

pub type DaoResult<T> = Result<T, DaoError>;

impl DaoError {
    /// Map a driver error at a query boundary: no-rows and interrupt get
    /// their distinguished variants, everything else is a driver failure.
    pub(crate) fn from_driver(err: rusqlite::Error) -> DaoError {
        if is_interrupt(&err) {
            return DaoError::Cancelled;
        }
        match err {
            rusqlite::Error::QueryReturnedNoRows => DaoError::NoRows,
            other => DaoError::Sqlite {
                message: other.to_string(),
            },
        }
    }

    /// Map a driver error reported by the row cursor mid-iteration.
    pub(crate) fn cursor(err: rusqlite::Error) -> DaoError {
        if is_interrupt(&err) {
            return DaoError::Cancelled;
        }
        DaoError::Cursor {
            message: err.to_string(),
        }
    }

    /// Map a driver error raised while reading one column into a field.
    pub(crate) fn scan(column: &str, err: rusqlite::Error) -> DaoError {
        if is_interrupt(&err) {
            return DaoError::Cancelled;
        }
        DaoError::Scan {
            column: column.to_string(),
            message: err.to_string(),
        }
    }

    /// Map a driver error from statement execution.
    pub(crate) fn exec(err: rusqlite::Error) -> DaoError {
        if is_interrupt(&err) {
            return DaoError::Cancelled;
        }
        DaoError::Exec {
            message: err.to_string(),
        }
    }
}

/// `sqlite3_interrupt` surfaces as `SQLITE_INTERRUPT`; that is a
/// cancellation, not an I/O failure.
fn is_interrupt(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::OperationInterrupted
    )
}
