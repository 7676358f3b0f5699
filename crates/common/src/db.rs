//! Shared database types for Kolab
//!
//! This module provides common database-related types used across domain
//! repositories, including the translation of Postgres unique-violation
//! errors into `Conflict` responses.

use crate::error::Error;
use thiserror::Error;

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::AlreadyExists => Error::Conflict("Record already exists".to_string()),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::InvalidData(msg) => Error::Validation(msg),
        }
    }
}

/// Check whether a sqlx error is a Postgres unique-constraint violation.
///
/// Used by repositories to turn a duplicate insert that raced past the
/// application-level existence check into a `Conflict` instead of a 500.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

/// Resolve a compare-and-swap status update.
///
/// Repositories update status rows with `WHERE id = $1 AND status = $expected`;
/// a returning query that matched no row means a concurrent transition won the
/// race, which maps to `Conflict`.
pub fn require_cas_row<T>(
    row: Option<T>,
    entity: &str,
    id: impl std::fmt::Display,
) -> Result<T, Error> {
    row.ok_or_else(|| Error::Conflict(format!("{entity} {id} was modified concurrently")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_mapping() {
        assert!(matches!(
            Error::from(RepositoryError::NotFound),
            Error::NotFound(_)
        ));
        assert!(matches!(
            Error::from(RepositoryError::AlreadyExists),
            Error::Conflict(_)
        ));
        assert!(matches!(
            Error::from(RepositoryError::InvalidData("bad".to_string())),
            Error::Validation(_)
        ));
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_cas_miss_is_conflict() {
        let won = require_cas_row(Some(42), "payment", "abc").unwrap();
        assert_eq!(won, 42);

        let err = require_cas_row::<i32>(None, "payment", "abc").unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(err.to_string().contains("modified concurrently"));
    }
}
