//! Configuration for the token service

use crate::domain::entities::token::DEFAULT_TOKEN_TTL_SECONDS;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Lifetime of issued tokens in seconds
    pub token_ttl_seconds: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

impl TokenServiceConfig {
    /// Create a configuration with an explicit TTL
    pub fn with_ttl_seconds(token_ttl_seconds: i64) -> Self {
        Self { token_ttl_seconds }
    }
}
