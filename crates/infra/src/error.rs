//! Storage-boundary error model.

use thiserror::Error;

use parlor_core::DomainError;

/// Result type returned by repositories and the inventory context.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error raised at the storage boundary.
///
/// A missing record is not represented here: lookups return `Option` and
/// deletes return `bool`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Input rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// Connectivity, constraint or decoding failure in the backing store.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl RepositoryError {
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}

/// Map a SQLx error to a `RepositoryError`, tagging the failed operation.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            RepositoryError::Persistence(format!(
                "database error in {operation} (code {code}): {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Persistence(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            RepositoryError::Persistence(format!("timed out acquiring a connection in {operation}"))
        }
        _ => RepositoryError::Persistence(format!("sqlx error in {operation}: {err}")),
    }
}
