//! Handler for POST /api/v1/auth/login

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use sk_core::repositories::{TokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::auth::{LoginRequest, LoginResponse, TokenResponse, UserProfile};
use crate::handlers::error::{map_domain_error, ApiError};
use crate::middleware::client_info::client_meta;

/// Authenticate with email and password and issue an access token.
///
/// The route is composed with the rate limiter; a throttled caller is
/// refused before this handler runs. Bad credentials of any kind come
/// back as the uniform 401.
///
/// # Request Body
///
/// ```json
/// { "email": "owner@example.com", "password": "..." }
/// ```
///
/// # Responses
/// - 200: access token plus user profile
/// - 400: structurally invalid request body
/// - 401: unknown email, wrong password, or disabled account
/// - 429: admission refused
pub async fn login<U, T>(
    req: HttpRequest,
    state: web::Data<AppState<U, T>>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let client = client_meta(req.head());
    let session = state
        .auth_service
        .login(&body.email, &body.password, Some(client))
        .await
        .map_err(|e| map_domain_error(&e))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: TokenResponse::from(&session.token),
        user: UserProfile::from(session.user),
    }))
}
