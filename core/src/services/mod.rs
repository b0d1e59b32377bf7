//! Business services containing domain logic and use cases.

pub mod auth;
pub mod rate_limit;
pub mod token;

// Re-export commonly used types
pub use auth::AuthService;
pub use rate_limit::{RateLimiter, RateLimiterConfig, Sweeper};
pub use token::{TokenService, TokenServiceConfig, UsageRecorder, UsageUpdate, UsageWorker};
