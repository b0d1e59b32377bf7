//! Handler for GET /api/v1/auth/me

use actix_web::{web, HttpResponse};

use sk_core::repositories::{TokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::auth::UserProfile;
use crate::handlers::error::{map_domain_error, ApiError};
use crate::middleware::auth::AuthContext;

/// Return the profile of the authenticated user.
///
/// # Responses
/// - 200: user profile
/// - 401: missing or invalid token
pub async fn me<U, T>(
    state: web::Data<AppState<U, T>>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let user = state
        .auth_service
        .current_user(auth.user_id)
        .await
        .map_err(|e| map_domain_error(&e))?;

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}
