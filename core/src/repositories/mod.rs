//! Repository interfaces consumed by the domain services.
//!
//! Concrete database implementations live in `sk_infra`; the in-memory
//! mocks here back the test suites.

pub mod token;
pub mod user;

pub use token::{MockTokenRepository, TokenRepository};
pub use user::{MockUserRepository, UserRepository};
