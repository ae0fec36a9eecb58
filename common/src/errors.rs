// Error handling framework

use crate::event::ApiResponse;
use crate::validation::FieldError;
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

/// Database-specific errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The store could not be reached (I/O, TLS, pool exhaustion or shutdown)
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Object storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object storage configuration error: {0}")]
    Configuration(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object read failed: {0}")]
    ReadFailed(String),

    #[error("Presigning failed: {0}")]
    PresignFailed(String),
}

/// Every way an action can end without a success envelope.
///
/// Each variant carries enough detail to log server-side; the caller only
/// ever sees the fixed body produced by [`ActionError::into_response`].
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Route not found")]
    RouteNotFound,

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Cache object unavailable: {0}")]
    CacheUnavailable(String),

    #[error("No approved content for {date} {hour}")]
    NoApprovedContent { date: NaiveDate, hour: String },

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Signing failed: {0}")]
    SigningFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    pub fn status(&self) -> StatusCode {
        match self {
            ActionError::RouteNotFound
            | ActionError::CacheUnavailable(_)
            | ActionError::NoApprovedContent { .. } => StatusCode::NOT_FOUND,
            ActionError::Validation(_) => StatusCode::BAD_REQUEST,
            ActionError::DependencyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ActionError::SigningFailure(_) | ActionError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label used for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::RouteNotFound => "route_not_found",
            ActionError::Validation(_) => "validation_error",
            ActionError::CacheUnavailable(_) => "cache_unavailable",
            ActionError::NoApprovedContent { .. } => "not_found",
            ActionError::DependencyUnavailable(_) => "dependency_unavailable",
            ActionError::SigningFailure(_) => "signing_failure",
            ActionError::Internal(_) => "internal_error",
        }
    }

    /// Build the client-facing envelope. Internal detail never leaves here.
    pub fn into_response(self) -> ApiResponse {
        let status = self.status();
        let body = match self {
            ActionError::RouteNotFound => json!({ "error": "Route not found" }),
            ActionError::Validation(errors) => json!({ "error": errors }),
            ActionError::CacheUnavailable(_) => json!({ "error": "Cache not found or invalid" }),
            ActionError::NoApprovedContent { .. } => {
                json!({ "message": "No approved content for this slot" })
            }
            ActionError::DependencyUnavailable(_) => {
                json!({ "error": "Service temporarily unavailable" })
            }
            ActionError::SigningFailure(_) => json!({ "error": "Failed to generate access URL" }),
            ActionError::Internal(_) => json!({ "error": "Internal Server Error" }),
        };
        ApiResponse::json(status, &body)
    }
}

impl From<DatabaseError> for ActionError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConnectionFailed(msg) => ActionError::DependencyUnavailable(msg),
            other => ActionError::Internal(other.to_string()),
        }
    }
}

impl From<Vec<FieldError>> for ActionError {
    fn from(errors: Vec<FieldError>) -> Self {
        ActionError::Validation(errors)
    }
}

impl DatabaseError {
    /// Classify a BEGIN or COMMIT failure. Transport errors stay connection
    /// failures so they surface as 503 like any other query.
    pub fn transaction(err: sqlx::Error) -> Self {
        match DatabaseError::from(err) {
            DatabaseError::ConnectionFailed(msg) => DatabaseError::ConnectionFailed(msg),
            DatabaseError::QueryFailed(msg) | DatabaseError::NotFound(msg) => {
                DatabaseError::TransactionFailed(msg)
            }
            other => other,
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DatabaseError::ConnectionFailed(err.to_string()),
            sqlx::Error::Database(db_err) => DatabaseError::QueryFailed(db_err.message().to_string()),
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}
