//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Transient failure in the backing store. Propagated unchanged; retry
    /// policy belongs to the caller. Never presented as an authentication
    /// failure.
    #[error("Storage unavailable: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether this error is a credential rejection that must be collapsed
    /// to a single opaque "unauthorized" outcome at the API boundary.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(self, DomainError::Token(_) | DomainError::Auth(_))
    }
}
