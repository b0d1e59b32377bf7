//! ShopKeep API server binary.
//!
//! Wires the MySQL repositories, the token authority with its telemetry
//! worker, the rate limiter with its sweeper, and the HTTP server. Both
//! background tasks are shut down explicitly once the server exits.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use tracing_subscriber::EnvFilter;

use sk_api::app::{create_app, AppState};
use sk_api::middleware::auth::TokenVerifier;
use sk_core::services::auth::AuthService;
use sk_core::services::rate_limit::{RateLimiter, RateLimiterConfig, Sweeper};
use sk_core::services::token::{TokenService, TokenServiceConfig, UsageRecorder};
use sk_infra::database::connection::DatabasePool;
use sk_infra::database::mysql::{MySqlTokenRepository, MySqlUserRepository};
use sk_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    tracing::info!("starting ShopKeep API server");

    let pool = DatabasePool::new(&config.database)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let token_repository = Arc::new(MySqlTokenRepository::new(pool.get_pool().clone()));
    let user_repository = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));

    // Usage telemetry: bounded queue, one background writer
    let (recorder, usage_worker) = UsageRecorder::spawn(Arc::clone(&token_repository), 1024);

    let token_service = Arc::new(
        TokenService::new(
            token_repository,
            TokenServiceConfig::with_ttl_seconds(config.auth.token_ttl_seconds),
        )
        .with_recorder(recorder),
    );
    let verifier: Arc<dyn TokenVerifier> = Arc::clone(&token_service) as Arc<dyn TokenVerifier>;

    let auth_service = Arc::new(AuthService::new(user_repository, token_service));

    // One limiter instance per process, swept in the background
    let limiter = Arc::new(RateLimiter::new(RateLimiterConfig {
        capacity: config.rate_limit.capacity,
        refill_per_minute: config.rate_limit.refill_per_minute,
        idle_timeout: Duration::from_secs(config.rate_limit.idle_timeout_seconds),
    }));
    let sweeper = Sweeper::spawn(
        Arc::clone(&limiter),
        Duration::from_secs(config.rate_limit.sweep_interval_seconds),
    );

    let app_state = web::Data::new(AppState { auth_service });
    let verifier = web::Data::new(verifier);
    let client_origin = config.server.client_origin.clone();

    let bind_address = config.server.bind_address();
    tracing::info!(%bind_address, "binding HTTP server");

    let server = HttpServer::new(move || {
        create_app(
            app_state.clone(),
            verifier.clone(),
            Arc::clone(&limiter),
            &client_origin,
        )
    });
    let server = if config.server.workers > 0 {
        server.workers(config.server.workers)
    } else {
        server
    };

    server.bind(&bind_address)?.run().await?;

    // Stop the background tasks before the process exits
    tracing::info!("server stopped, shutting down background tasks");
    sweeper.shutdown().await;
    usage_worker.shutdown().await;
    pool.close().await;

    Ok(())
}
