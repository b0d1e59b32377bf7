//! Admission-control middleware for sensitive endpoints.
//!
//! Wraps routes such as login and token refresh with a per-client-address
//! budget. Refusal happens before any credential work: a throttled caller
//! gets a 429 without the request ever reaching token verification. The
//! limiter instance is owned by `main` and shared by reference - there is
//! no global state.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use sk_core::services::rate_limit::RateLimiter;

use crate::handlers::error::ApiError;
use crate::middleware::client_info::identity_key;

/// Rate limiter middleware factory
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    /// Create a guard around a shared limiter instance
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = Arc::clone(&self.limiter);

        Box::pin(async move {
            let identity = identity_key(req.head());

            if !limiter.allow(&identity) {
                tracing::debug!(%identity, "admission refused");
                let response = ApiError::RateLimited.error_response();
                return Ok(req.into_response(response).map_into_right_body());
            }

            service.call(req).await.map(|res| res.map_into_left_body())
        })
    }
}
