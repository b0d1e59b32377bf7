//! Request handler support: domain-to-HTTP error mapping.

pub mod error;

pub use error::{map_domain_error, ApiError};
