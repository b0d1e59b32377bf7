//! Bearer-token authentication middleware.
//!
//! The guard extracts the bearer credential, asks the token authority to
//! verify it, and injects an [`AuthContext`] into the request extensions.
//! Every failure mode - absent header, wrong scheme, unknown, expired or
//! revoked token - produces the same opaque 401; which one it was is
//! visible only in server logs. Storage outages become 500s: an outage is
//! not an authentication verdict.

use actix_web::{
    body::EitherBody,
    dev::{RequestHead, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use sk_core::domain::entities::token::{AccessToken, ClientMeta};
use sk_core::errors::{DomainError, TokenError};
use sk_core::repositories::TokenRepository;
use sk_core::services::token::TokenService;

use crate::handlers::error::ApiError;
use crate::middleware::client_info::client_meta;

/// Authenticated identity injected into requests by the guard
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Subject of the verified token
    pub user_id: Uuid,
    /// The token that authenticated this request; logout revokes it
    pub token_id: Uuid,
}

impl AuthContext {
    /// Build the context from a verified token record
    pub fn from_token(token: &AccessToken) -> Self {
        Self {
            user_id: token.user_id,
            token_id: token.id,
        }
    }
}

/// Object-safe facade over the token authority, so the guard can live in
/// app data without knowing the repository type.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a credential, recording usage telemetry on success
    async fn verify_credential(
        &self,
        credential: &str,
        usage: Option<ClientMeta>,
    ) -> Result<AccessToken, DomainError>;
}

#[async_trait]
impl<R: TokenRepository> TokenVerifier for TokenService<R> {
    async fn verify_credential(
        &self,
        credential: &str,
        usage: Option<ClientMeta>,
    ) -> Result<AccessToken, DomainError> {
        self.verify(credential, usage).await
    }
}

/// Authentication guard middleware factory.
///
/// Expects an `Arc<dyn TokenVerifier>` registered as app data.
pub struct AuthGuard;

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Authentication guard middleware service
pub struct AuthGuardMiddleware<S> {
    service: Rc<S>,
}

/// Short-circuit with an error response, consuming the request
fn reject_with<B>(req: ServiceRequest, error: &ApiError) -> ServiceResponse<EitherBody<B>> {
    let response = error.error_response();
    req.into_response(response).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for AuthGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let verifier = match req.app_data::<web::Data<Arc<dyn TokenVerifier>>>() {
                Some(verifier) => verifier.clone(),
                None => {
                    tracing::error!("token verifier not configured in app data");
                    return Ok(reject_with(req, &ApiError::Internal));
                }
            };

            let credential = match extract_bearer_token(req.head()) {
                Ok(credential) => credential,
                Err(error) => {
                    tracing::debug!(%error, "no usable bearer credential");
                    return Ok(reject_with(req, &ApiError::Unauthorized));
                }
            };

            let usage = client_meta(req.head());
            match verifier.verify_credential(&credential, Some(usage)).await {
                Ok(token) => {
                    req.extensions_mut().insert(AuthContext::from_token(&token));
                    service.call(req).await.map(|res| res.map_into_left_body())
                }
                Err(error) if error.is_credential_rejection() => {
                    tracing::debug!(%error, "rejected bearer credential");
                    Ok(reject_with(req, &ApiError::Unauthorized))
                }
                Err(error) => {
                    tracing::error!(%error, "credential verification failed");
                    Ok(reject_with(req, &ApiError::Internal))
                }
            }
        })
    }
}

/// Extract the bearer credential from the Authorization header.
///
/// The scheme keyword is case-insensitive; exactly one space separates it
/// from the credential. Anything else is treated as no credential.
pub fn extract_bearer_token(head: &RequestHead) -> Result<String, TokenError> {
    let value = head
        .headers
        .get(AUTHORIZATION)
        .ok_or(TokenError::Missing)?
        .to_str()
        .map_err(|_| TokenError::Malformed)?;

    let (scheme, credential) = value.split_once(' ').ok_or(TokenError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Malformed);
    }
    if credential.is_empty() || credential.contains(' ') {
        return Err(TokenError::Malformed);
    }

    Ok(credential.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized.into());

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn bearer_of(header: &str) -> Result<String, TokenError> {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, header))
            .to_http_request();
        extract_bearer_token(req.head())
    }

    #[test]
    fn test_extracts_well_formed_bearer() {
        assert_eq!(bearer_of("Bearer abc123").unwrap(), "abc123");
    }

    #[test]
    fn test_scheme_keyword_is_case_insensitive() {
        assert_eq!(bearer_of("bearer abc123").unwrap(), "abc123");
        assert_eq!(bearer_of("BEARER abc123").unwrap(), "abc123");
    }

    #[test]
    fn test_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(
            extract_bearer_token(req.head()).unwrap_err(),
            TokenError::Missing
        );
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        for header in [
            "abc123",
            "Basic abc123",
            "Bearer",
            "Bearer ",
            "Bearer  abc123",
            "Bearer abc 123",
        ] {
            assert_eq!(
                bearer_of(header).unwrap_err(),
                TokenError::Malformed,
                "accepted: {header:?}"
            );
        }
    }
}
