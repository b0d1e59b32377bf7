//! End-to-end tests for the authentication flow over the full app:
//! login, authenticated access, rotation, logout.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{test, web};

use sk_api::app::{create_app, AppState};
use sk_api::middleware::auth::TokenVerifier;
use sk_core::domain::entities::user::User;
use sk_core::repositories::{MockTokenRepository, MockUserRepository};
use sk_core::services::auth::AuthService;
use sk_core::services::rate_limit::{RateLimiter, RateLimiterConfig};
use sk_core::services::token::{TokenService, TokenServiceConfig};

const EMAIL: &str = "owner@shopkeep.dev";
const PASSWORD: &str = "correct-horse-battery";

struct TestHarness {
    app_state: web::Data<AppState<MockUserRepository, MockTokenRepository>>,
    verifier: web::Data<Arc<dyn TokenVerifier>>,
    limiter: Arc<RateLimiter>,
}

async fn harness() -> TestHarness {
    let users = Arc::new(MockUserRepository::new());
    // bcrypt::MIN_COST is not public; 4 is its value (the minimum valid cost).
    let mut user = User::new(EMAIL, bcrypt::hash(PASSWORD, 4).unwrap());
    user.display_name = Some("Shop Owner".to_string());
    users.insert(user).await;

    let tokens = Arc::new(MockTokenRepository::new());
    let token_service = Arc::new(TokenService::new(tokens, TokenServiceConfig::default()));
    let verifier: Arc<dyn TokenVerifier> = Arc::clone(&token_service) as Arc<dyn TokenVerifier>;

    let auth_service = Arc::new(AuthService::new(users, token_service));

    // Generous budget so throttling does not interfere with flow tests
    let limiter = Arc::new(RateLimiter::new(RateLimiterConfig {
        capacity: 100,
        refill_per_minute: 100,
        idle_timeout: Duration::from_secs(300),
    }));

    TestHarness {
        app_state: web::Data::new(AppState { auth_service }),
        verifier: web::Data::new(verifier),
        limiter,
    }
}

macro_rules! app {
    ($h:expr) => {
        test::init_service(create_app(
            $h.app_state.clone(),
            $h.verifier.clone(),
            Arc::clone(&$h.limiter),
            "*",
        ))
        .await
    };
}

fn login_req(email: &str, password: &str) -> actix_web::test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({ "email": email, "password": password }))
}

#[actix_web::test]
async fn test_health_endpoint() {
    let h = harness().await;
    let app = app!(h);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "shopkeep-api");
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let h = harness().await;
    let app = app!(h);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/nope").to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_login_returns_a_working_token() {
    let h = harness().await;
    let app = app!(h);

    let resp = test::call_service(&app, login_req(EMAIL, PASSWORD).to_request()).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["email"], EMAIL);
    assert!(body["expires_in"].as_i64().unwrap() > 0);

    let token = body["access_token"].as_str().unwrap().to_string();
    let me = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, me).await;
    assert_eq!(resp.status(), 200);

    let profile: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(profile["email"], EMAIL);
    assert_eq!(profile["display_name"], "Shop Owner");
}

#[actix_web::test]
async fn test_login_with_bad_credentials_is_401() {
    let h = harness().await;
    let app = app!(h);

    let wrong_password =
        test::call_service(&app, login_req(EMAIL, "wrong-password").to_request()).await;
    assert_eq!(wrong_password.status(), 401);

    let unknown_user = test::call_service(
        &app,
        login_req("stranger@shopkeep.dev", PASSWORD).to_request(),
    )
    .await;
    assert_eq!(unknown_user.status(), 401);
}

#[actix_web::test]
async fn test_login_with_invalid_body_is_400() {
    let h = harness().await;
    let app = app!(h);

    let resp = test::call_service(&app, login_req("not-an-email", PASSWORD).to_request()).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_refresh_rotates_the_token() {
    let h = harness().await;
    let app = app!(h);

    let login = test::call_service(&app, login_req(EMAIL, PASSWORD).to_request()).await;
    let body: serde_json::Value = test::read_body_json(login).await;
    let old_token = body["access_token"].as_str().unwrap().to_string();

    // Rotate via the JSON body
    let refresh = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(serde_json::json!({ "token": old_token }))
        .to_request();
    let resp = test::call_service(&app, refresh).await;
    assert_eq!(resp.status(), 200);

    let rotated: serde_json::Value = test::read_body_json(resp).await;
    let new_token = rotated["access_token"].as_str().unwrap().to_string();
    assert_ne!(new_token, old_token);

    // The old credential is dead from the moment the response existed
    let stale = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {old_token}")))
        .to_request();
    assert_eq!(test::call_service(&app, stale).await.status(), 401);

    // A second rotation attempt with the old token fails too
    let replay = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(serde_json::json!({ "token": old_token }))
        .to_request();
    assert_eq!(test::call_service(&app, replay).await.status(), 401);

    let fresh = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {new_token}")))
        .to_request();
    assert_eq!(test::call_service(&app, fresh).await.status(), 200);
}

#[actix_web::test]
async fn test_refresh_accepts_the_bearer_header_too() {
    let h = harness().await;
    let app = app!(h);

    let login = test::call_service(&app, login_req(EMAIL, PASSWORD).to_request()).await;
    let body: serde_json::Value = test::read_body_json(login).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let refresh = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, refresh).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_refresh_without_any_token_is_401() {
    let h = harness().await;
    let app = app!(h);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_logout_revokes_the_current_session() {
    let h = harness().await;
    let app = app!(h);

    let login = test::call_service(&app, login_req(EMAIL, PASSWORD).to_request()).await;
    let body: serde_json::Value = test::read_body_json(login).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let logout = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    assert_eq!(test::call_service(&app, logout).await.status(), 204);

    let me = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    assert_eq!(test::call_service(&app, me).await.status(), 401);
}

#[actix_web::test]
async fn test_logout_all_ends_every_session_of_the_user() {
    let h = harness().await;
    let app = app!(h);

    let first = test::call_service(&app, login_req(EMAIL, PASSWORD).to_request()).await;
    let first: serde_json::Value = test::read_body_json(first).await;
    let first_token = first["access_token"].as_str().unwrap().to_string();

    let second = test::call_service(&app, login_req(EMAIL, PASSWORD).to_request()).await;
    let second: serde_json::Value = test::read_body_json(second).await;
    let second_token = second["access_token"].as_str().unwrap().to_string();

    let logout_all = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(("Authorization", format!("Bearer {second_token}")))
        .set_json(serde_json::json!({ "all": true }))
        .to_request();
    assert_eq!(test::call_service(&app, logout_all).await.status(), 204);

    for token in [first_token, second_token] {
        let me = test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        assert_eq!(test::call_service(&app, me).await.status(), 401);
    }
}
