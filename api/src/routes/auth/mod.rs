//! Authentication route handlers
//!
//! - `POST /api/v1/auth/login` - authenticate and issue a token (throttled)
//! - `POST /api/v1/auth/refresh` - rotate the current token (throttled)
//! - `POST /api/v1/auth/logout` - revoke the session (authenticated)
//! - `GET /api/v1/auth/me` - resolve the authenticated user

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;

pub use login::login;
pub use logout::logout;
pub use me::me;
pub use refresh::refresh;
