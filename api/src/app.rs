//! Application state and factory
//!
//! This module handles the initialization of the application state
//! and provides the factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use sk_core::repositories::{TokenRepository, UserRepository};
use sk_core::services::auth::AuthService;
use sk_core::services::rate_limit::RateLimiter;

use crate::middleware::auth::{AuthGuard, TokenVerifier};
use crate::middleware::cors::create_cors;
use crate::middleware::rate_limit::RateLimit;
use crate::routes::auth::{login, logout, me, refresh};

/// Shared application state handed to the route handlers
pub struct AppState<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Authentication service driving login, rotation and logout
    pub auth_service: Arc<AuthService<U, T>>,
}

/// Create and configure the application with all dependencies.
///
/// The rate limiter wraps only the credential-sensitive routes (login and
/// refresh) and runs before any token work; the auth guard wraps the
/// routes that require an authenticated session.
pub fn create_app<U, T>(
    app_state: web::Data<AppState<U, T>>,
    verifier: web::Data<Arc<dyn TokenVerifier>>,
    limiter: Arc<RateLimiter>,
    client_origin: &str,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let cors = create_cors(client_origin);

    App::new()
        // Add application state
        .app_data(app_state)
        .app_data(verifier)
        // Add middleware (request logging outermost, then CORS)
        .wrap(cors)
        .wrap(TracingLogger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .service(
                        web::resource("/login")
                            .wrap(RateLimit::new(Arc::clone(&limiter)))
                            .route(web::post().to(login::<U, T>)),
                    )
                    .service(
                        web::resource("/refresh")
                            .wrap(RateLimit::new(Arc::clone(&limiter)))
                            .route(web::post().to(refresh::<U, T>)),
                    )
                    .service(
                        web::resource("/logout")
                            .wrap(AuthGuard)
                            .route(web::post().to(logout::<U, T>)),
                    )
                    .service(
                        web::resource("/me")
                            .wrap(AuthGuard)
                            .route(web::get().to(me::<U, T>)),
                    ),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "shopkeep-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
