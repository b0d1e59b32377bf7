//! Server configuration module

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Comma-separated list of allowed CORS origins ("*" = any)
    #[serde(default = "default_client_origin")]
    pub client_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            workers: 0, // Use all CPU cores
            client_origin: default_client_origin(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration for the given bind address
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from environment variables
    ///
    /// Reads `SERVER_HOST`, `SERVER_PORT`, `SERVER_WORKERS` and
    /// `CLIENT_ORIGIN`.
    pub fn from_env() -> Self {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);
        let workers = std::env::var("SERVER_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let client_origin =
            std::env::var("CLIENT_ORIGIN").unwrap_or_else(|_| default_client_origin());

        Self {
            host,
            port,
            workers,
            client_origin,
        }
    }

    /// The address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_client_origin() -> String {
    String::from("*")
}
