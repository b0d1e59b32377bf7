//! Token authority for the opaque bearer-token scheme.
//!
//! This module is the sole place credentials are created and judged:
//! - generation and hashing of random credentials
//! - verification against the token store
//! - rotation (revoke old, issue new, atomically with respect to readers)
//! - revocation, per token and per user
//! - fire-and-forget usage telemetry

mod config;
mod service;
mod telemetry;


pub use config::TokenServiceConfig;
pub use service::TokenService;
pub use telemetry::{UsageRecorder, UsageUpdate, UsageWorker};
