//! # ShopKeep Core
//!
//! Core business logic and domain layer for the ShopKeep backend.
//! This crate contains domain entities, the token authority, the in-process
//! rate limiter, repository interfaces, and error types that form the
//! foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::token::{AccessToken, ClientMeta};
pub use domain::entities::user::User;
pub use domain::value_objects::auth_session::{AuthenticatedSession, IssuedToken};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{MockTokenRepository, MockUserRepository, TokenRepository, UserRepository};
pub use services::{
    AuthService, RateLimiter, RateLimiterConfig, Sweeper, TokenService, TokenServiceConfig,
    UsageRecorder, UsageUpdate, UsageWorker,
};
