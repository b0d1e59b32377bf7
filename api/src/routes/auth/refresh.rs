//! Handler for POST /api/v1/auth/refresh

use actix_web::{web, HttpRequest, HttpResponse};

use sk_core::repositories::{TokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::auth::{RefreshRequest, TokenResponse};
use crate::handlers::error::{map_domain_error, ApiError};
use crate::middleware::auth::extract_bearer_token;
use crate::middleware::client_info::client_meta;

/// Rotate the presented token: the old credential is revoked and a fresh
/// one is returned for the same user.
///
/// The current plaintext is taken from the `Authorization: Bearer` header
/// when present, otherwise from the JSON body. From the moment this
/// responds, the old token no longer validates; under concurrent rotation
/// of the same token exactly one caller receives a replacement.
///
/// # Request Body (alternative to the header)
///
/// ```json
/// { "token": "<current plaintext token>" }
/// ```
///
/// # Responses
/// - 200: fresh access token
/// - 401: old token unknown, expired or already rotated
/// - 429: admission refused
pub async fn refresh<U, T>(
    req: HttpRequest,
    state: web::Data<AppState<U, T>>,
    body: Option<web::Json<RefreshRequest>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let credential = extract_bearer_token(req.head())
        .ok()
        .or_else(|| body.map(|b| b.into_inner().token))
        .ok_or(ApiError::Unauthorized)?;

    let client = client_meta(req.head());
    let issued = state
        .auth_service
        .rotate(&credential, Some(client))
        .await
        .map_err(|e| map_domain_error(&e))?;

    Ok(HttpResponse::Ok().json(TokenResponse::from(&issued)))
}
