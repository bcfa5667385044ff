//! Shared service error taxonomy.
//!
//! One enum across all domain services; the HTTP layer maps variants to
//! status codes in a single place. Unique-constraint violations are
//! surfaced as `Conflict` so concurrent duplicate creation races map to
//! 409 instead of a generic server error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0} not found")]
    NotFound(String),

    /// Anonymous caller on an identity-required mutation. Rendered as
    /// HTTP 403, not 401, for compatibility with the legacy API.
    #[error("Authentication required")]
    Authentication,

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Media storage failed: {0}")]
    Media(String),

    #[error("Database error: {0}")]
    Database(sea_orm::DbErr),
}

impl ServiceError {
    /// Single-field validation failure.
    pub fn invalid(field: &str, message: &str) -> Self {
        ServiceError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                ServiceError::Conflict(detail)
            }
            _ => ServiceError::Database(err),
        }
    }
}
