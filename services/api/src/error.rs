//! Error types for the repositories and the HTTP surface

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;
use tracing::error;

/// Errors raised by repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The requested entity does not exist
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Input rejected before or by the store schema
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// A uniqueness constraint was violated
    #[error("duplicate value for {field}")]
    DuplicateKey { field: String },

    /// The store is unreachable or misconfigured
    #[error(transparent)]
    Connection(#[from] DatabaseError),

    /// Any other failure reported by the store
    #[error("Database query error: {0}")]
    Query(#[source] sqlx::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        RepositoryError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let column = db
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(|pg| pg.column())
                .map(str::to_string);

            match db.code().as_deref() {
                Some("23505") => {
                    return RepositoryError::DuplicateKey {
                        field: field_from_constraint(db.constraint()),
                    };
                }
                Some("23502") | Some("23514") | Some("22P02") | Some("22001") => {
                    return RepositoryError::Validation {
                        field: column.unwrap_or_else(|| field_from_constraint(db.constraint())),
                        message: db.message().to_string(),
                    };
                }
                _ => {}
            }
        }

        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => RepositoryError::Connection(DatabaseError::Connection(err)),
            other => RepositoryError::Query(other),
        }
    }
}

/// Extract the column name from a `<table>_<column>_key` constraint name.
pub(crate) fn field_from_constraint(constraint: Option<&str>) -> String {
    constraint
        .and_then(|name| name.strip_suffix("_key"))
        .and_then(|name| name.split_once('_'))
        .map(|(_, field)| field.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Type alias for repository results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Log a failed repository operation and hand the result back unchanged
pub(crate) trait LogFailure {
    fn log_failure(self, operation: &str) -> Self;
}

impl<T> LogFailure for RepositoryResult<T> {
    fn log_failure(self, operation: &str) -> Self {
        self.inspect_err(|e| match e {
            RepositoryError::Validation { field, .. } | RepositoryError::DuplicateKey { field } => {
                error!(operation, field = %field, "{}", e)
            }
            _ => error!(operation, "{}", e),
        })
    }
}

/// Error type for the HTTP surface
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Repository failure
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
                RepositoryError::Validation { .. } => StatusCode::BAD_REQUEST,
                RepositoryError::DuplicateKey { .. } => StatusCode::CONFLICT,
                RepositoryError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
                RepositoryError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            ApiError::Repository(RepositoryError::Connection(_)) => {
                "Database unavailable".to_string()
            }
            ApiError::Repository(RepositoryError::Query(_)) => "Database error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
