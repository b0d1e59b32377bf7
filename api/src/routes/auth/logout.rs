//! Handler for POST /api/v1/auth/logout

use actix_web::{web, HttpResponse};

use sk_core::repositories::{TokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::auth::LogoutRequest;
use crate::handlers::error::{map_domain_error, ApiError};
use crate::middleware::auth::AuthContext;

/// Revoke the session that made this request.
///
/// Runs behind the auth guard, so the presented token is already
/// verified. With `{"all": true}` every token of the user is revoked -
/// the kill switch for a lost device or a leaked credential.
///
/// # Responses
/// - 204: session(s) revoked
/// - 401: missing or invalid token
pub async fn logout<U, T>(
    state: web::Data<AppState<U, T>>,
    auth: AuthContext,
    body: Option<web::Json<LogoutRequest>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let all = body.map(|b| b.all).unwrap_or(false);

    state
        .auth_service
        .logout(auth.token_id, auth.user_id, all)
        .await
        .map_err(|e| map_domain_error(&e))?;

    Ok(HttpResponse::NoContent().finish())
}
