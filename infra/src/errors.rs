//! Infrastructure error types

use thiserror::Error;

/// Errors raised while setting up or talking to infrastructure services
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
