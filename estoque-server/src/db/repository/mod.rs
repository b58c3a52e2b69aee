//! Repository Module
//!
//! CRUD operations over the SQLite tables. Functions take the pool (or a
//! transaction) explicitly; every multi-statement mutation runs inside a
//! single transaction.

pub mod categoria;
pub mod produto;

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Build a `?, ?, ...` placeholder list for an `IN (...)` clause.
///
/// SQLite has no array binding, so id lists are expanded into
/// positional placeholders and bound one by one.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
