//! Database connection pool management
//!
//! Connection pooling via SQLx with MySQL: pool sizing, acquire
//! timeouts, and a health check used by the server's readiness probe.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::time::Duration;

use sk_shared::config::DatabaseConfig;

use crate::errors::InfrastructureError;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `config` - Database configuration settings
    pub async fn new(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        tracing::info!(
            max_connections = config.max_connections,
            "creating database connection pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .test_before_acquire(true)
            .connect(&config.url)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to create database pool");
                InfrastructureError::Database(e)
            })?;

        tracing::info!("database connection pool created");
        Ok(Self { pool })
    }

    /// Get a reference to the underlying SQLx pool
    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Verify the database answers a trivial query
    pub async fn health_check(&self) -> Result<(), InfrastructureError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(InfrastructureError::Database)
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
