//! Custom error types for the common library
//!
//! This module defines the infrastructure error types shared by every
//! service that talks to the store.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The store is unreachable or refused the credentials
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify an error raised while opening the pool
    pub fn from_connect(err: SqlxError) -> Self {
        match err {
            SqlxError::Configuration(e) => {
                DatabaseError::Configuration(format!("Invalid database URL: {}", e))
            }
            other => DatabaseError::Connection(other),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
