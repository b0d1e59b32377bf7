//! Authentication flow: login, rotation, logout.

mod service;

pub use service::AuthService;
