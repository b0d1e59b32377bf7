//! CORS middleware configuration for cross-origin requests.

use actix_cors::Cors;
use actix_web::http::{header, Method};

/// Creates a CORS middleware instance for the configured client origin.
///
/// `client_origin` is either `"*"` (any origin, the development default)
/// or a comma-separated list of allowed origins.
pub fn create_cors(client_origin: &str) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
        ])
        .max_age(3600);

    if client_origin.trim() == "*" {
        cors.allow_any_origin()
    } else {
        client_origin
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}
