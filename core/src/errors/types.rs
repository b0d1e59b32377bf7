//! Authentication and token error types.
//!
//! Internal code distinguishes the failure kinds for logging and tests;
//! the API boundary collapses every credential failure into one opaque
//! "unauthorized" response so the wire leaks nothing about why a
//! credential was rejected.

use thiserror::Error;

/// Authentication-flow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately a single variant so
    /// the two cases stay indistinguishable everywhere.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account disabled")]
    AccountDisabled,
}

/// Opaque bearer-token failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No Authorization header present
    #[error("Credential missing")]
    Missing,

    /// Header present but not a usable bearer value
    #[error("Credential malformed")]
    Malformed,

    /// Digest has no matching record
    #[error("Credential not found")]
    NotFound,

    /// Record found but past its expiry
    #[error("Credential expired")]
    Expired,

    /// Record found but revoked
    #[error("Credential revoked")]
    Revoked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message_does_not_name_a_cause() {
        let message = AuthError::InvalidCredentials.to_string();
        assert!(!message.to_lowercase().contains("email"));
        assert!(!message.to_lowercase().contains("password"));
    }

    #[test]
    fn test_token_error_variants_are_distinct() {
        assert_ne!(TokenError::Expired, TokenError::Revoked);
        assert_ne!(TokenError::Missing, TokenError::Malformed);
    }
}
