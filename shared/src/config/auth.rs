//! Authentication configuration

use serde::{Deserialize, Serialize};

/// Token lifetime configuration for the opaque bearer-token scheme.
///
/// Tokens are random credentials stored hashed server-side; there is no
/// signing key to configure. The only tunable is how long an issued
/// credential stays valid.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Access token time-to-live in seconds
    pub token_ttl_seconds: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_seconds: 7200, // 2 hours
        }
    }
}

impl AuthConfig {
    /// Set token TTL in hours
    pub fn with_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl_seconds = hours * 3600;
        self
    }

    /// Create from environment variables
    ///
    /// Reads `TOKEN_TTL_SECONDS`; invalid or missing values fall back to
    /// the default of 2 hours.
    pub fn from_env() -> Self {
        let token_ttl_seconds = std::env::var("TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7200);

        Self { token_ttl_seconds }
    }
}
