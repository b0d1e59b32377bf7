//! Token repository interface and in-memory mock.

mod mock;
mod r#trait;

pub use mock::MockTokenRepository;
pub use r#trait::TokenRepository;
