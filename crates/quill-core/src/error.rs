//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::{AuthError, MailError, MediaError};

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("{0} not found")]
    NotFoundByKey(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Forbidden")]
    Forbidden,

    #[error("Email delivery failed: {0}")]
    EmailDeliveryFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => DomainError::InvalidCredentials,
            AuthError::TokenExpired | AuthError::InvalidToken(_) => {
                DomainError::InvalidOrExpiredToken
            }
            AuthError::HashingError(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<MailError> for DomainError {
    fn from(err: MailError) -> Self {
        DomainError::EmailDeliveryFailed(err.to_string())
    }
}

impl From<MediaError> for DomainError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::UnsupportedFormat(ext) => {
                DomainError::Validation(format!("Unsupported picture type: {ext}"))
            }
            MediaError::Decode(msg) => DomainError::Validation(format!("Unreadable picture: {msg}")),
            MediaError::Storage(msg) | MediaError::Encode(msg) => DomainError::Internal(msg),
        }
    }
}
