//! Integration tests for the admission-control middleware.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{test, web, App, HttpResponse};

use sk_api::middleware::auth::{AuthGuard, TokenVerifier};
use sk_api::middleware::rate_limit::RateLimit;
use sk_core::repositories::MockTokenRepository;
use sk_core::services::rate_limit::{RateLimiter, RateLimiterConfig};
use sk_core::services::token::{TokenService, TokenServiceConfig};

fn limiter(capacity: u32) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(RateLimiterConfig {
        capacity,
        refill_per_minute: capacity,
        idle_timeout: Duration::from_secs(300),
    }))
}

async fn ok_handler() -> HttpResponse {
    HttpResponse::Ok().body("through")
}

#[actix_web::test]
async fn test_burst_budget_then_429() {
    let app = test::init_service(
        App::new().service(
            web::resource("/throttled")
                .wrap(RateLimit::new(limiter(5)))
                .route(web::post().to(ok_handler)),
        ),
    )
    .await;

    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri("/throttled")
            .insert_header(("X-Forwarded-For", "203.0.113.1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    let req = test::TestRequest::post()
        .uri("/throttled")
        .insert_header(("X-Forwarded-For", "203.0.113.1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 429);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "rate_limited");
}

#[actix_web::test]
async fn test_budgets_are_per_identity() {
    let app = test::init_service(
        App::new().service(
            web::resource("/throttled")
                .wrap(RateLimit::new(limiter(1)))
                .route(web::post().to(ok_handler)),
        ),
    )
    .await;

    let first = test::TestRequest::post()
        .uri("/throttled")
        .insert_header(("X-Forwarded-For", "203.0.113.1"))
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), 200);

    let exhausted = test::TestRequest::post()
        .uri("/throttled")
        .insert_header(("X-Forwarded-For", "203.0.113.1"))
        .to_request();
    assert_eq!(test::call_service(&app, exhausted).await.status(), 429);

    // Another caller is not affected by the first one's exhaustion
    let other = test::TestRequest::post()
        .uri("/throttled")
        .insert_header(("X-Forwarded-For", "203.0.113.2"))
        .to_request();
    assert_eq!(test::call_service(&app, other).await.status(), 200);
}

#[actix_web::test]
async fn test_admission_refusal_precedes_credential_checking() {
    // Rate limiting on the enclosing scope, authentication on the
    // resource: the scope middleware always runs first.
    let repo = Arc::new(MockTokenRepository::new());
    let service = Arc::new(TokenService::new(repo, TokenServiceConfig::default()));
    let verifier: Arc<dyn TokenVerifier> = service;

    let app = test::init_service(
        App::new().app_data(web::Data::new(verifier)).service(
            web::scope("/guarded").wrap(RateLimit::new(limiter(2))).service(
                web::resource("/me")
                    .wrap(AuthGuard)
                    .route(web::get().to(ok_handler)),
            ),
        ),
    )
    .await;

    // No credential at all: the first two requests spend the budget and
    // fail authentication
    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/guarded/me")
            .insert_header(("X-Forwarded-For", "203.0.113.9"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }

    // Budget exhausted: the rejection is admission control, not another
    // authentication failure
    let req = test::TestRequest::get()
        .uri("/guarded/me")
        .insert_header(("X-Forwarded-For", "203.0.113.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 429);
}
