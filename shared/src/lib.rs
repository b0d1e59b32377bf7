//! Shared utilities and common types for the ShopKeep server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Common response structures
//!
//! Business logic lives in `sk_core`; this crate must stay dependency-light.

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, DatabaseConfig, RateLimitConfig, ServerConfig};
pub use types::ErrorResponse;
