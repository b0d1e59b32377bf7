//! Request middleware: authentication guard, admission control, CORS.

pub mod auth;
pub mod client_info;
pub mod cors;
pub mod rate_limit;

pub use auth::{AuthContext, AuthGuard, TokenVerifier};
pub use cors::create_cors;
pub use rate_limit::RateLimit;
