//! # ShopKeep Infrastructure
//!
//! Concrete implementations of the repository interfaces defined in
//! `sk_core`, backed by MySQL through SQLx, plus connection-pool
//! management.

pub mod database;
pub mod errors;

pub use database::connection::DatabasePool;
pub use database::mysql::{MySqlTokenRepository, MySqlUserRepository};
pub use errors::InfrastructureError;
