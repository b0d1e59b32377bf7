//! Domain-to-HTTP error mapping.
//!
//! Every credential failure collapses to one opaque 401 with an identical
//! body, so a caller cannot learn whether a token was missing, malformed,
//! unknown, expired or revoked. Admission refusal is reported distinctly
//! as 429 - it carries no secrecy requirement. Storage outages surface as
//! 5xx, never as an authentication failure.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use sk_core::errors::DomainError;
use sk_shared::types::ErrorResponse;

/// API-level error with a uniform JSON body per status code
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Too many requests")]
    RateLimited,

    #[error("{0}")]
    Validation(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::RateLimited => "rate_limited",
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound => "not_found",
            ApiError::Internal => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ErrorResponse::new(self.error_code(), self.to_string()))
    }
}

/// Map a domain error to its API representation.
///
/// The cause-specific detail is logged here and goes no further.
pub fn map_domain_error(error: &DomainError) -> ApiError {
    if error.is_credential_rejection() {
        tracing::debug!(%error, "authentication rejected");
        return ApiError::Unauthorized;
    }

    match error {
        DomainError::NotFound { .. } => ApiError::NotFound,
        DomainError::Validation { message } => ApiError::Validation(message.clone()),
        other => {
            tracing::error!(error = %other, "request failed");
            ApiError::Internal
        }
    }
}
