//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token lifetime configuration
//! - `database` - Database connection and pool configuration
//! - `rate_limit` - Admission control for sensitive endpoints
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the full configuration from environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_complete() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert!(config.auth.token_ttl_seconds > 0);
        assert!(config.rate_limit.capacity > 0);
    }
}
