//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Uniform error body returned by the API.
///
/// Rejected requests of the same HTTP status must carry an identical body
/// shape so that callers cannot distinguish failure causes from the wire
/// format. Anything cause-specific stays in server-side logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code for programmatic handling
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serializes_flat() {
        let body = ErrorResponse::new("unauthorized", "Authentication required");
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "unauthorized");
        assert_eq!(json["message"], "Authentication required");
        assert!(json.get("timestamp").is_some());
    }
}
