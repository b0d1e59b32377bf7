//! Main authentication service implementation

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::ClientMeta;
use crate::domain::entities::user::User;
use crate::domain::value_objects::auth_session::{AuthenticatedSession, IssuedToken};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenService;

/// Authentication service for the login / rotate / logout flow.
///
/// Composes the user store with the token authority. Everything
/// credential-shaped that goes wrong during login collapses into
/// `AuthError::InvalidCredentials` so callers cannot probe which part
/// failed.
pub struct AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// User repository for account lookup
    users: Arc<U>,
    /// Token authority issuing and revoking credentials
    tokens: Arc<TokenService<T>>,
}

impl<U, T> AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Create a new authentication service
    pub fn new(users: Arc<U>, tokens: Arc<TokenService<T>>) -> Self {
        Self { users, tokens }
    }

    /// Authenticate with email and password and issue a token.
    ///
    /// Unknown email, wrong password and a malformed stored hash are
    /// indistinguishable to the caller. When the account does not exist a
    /// hash is still computed so the response time does not reveal
    /// whether the email is registered.
    ///
    /// # Arguments
    ///
    /// * `email` - Login email
    /// * `password` - Plaintext password, only ever compared, never stored
    /// * `client` - Client metadata recorded at issuance
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: Option<ClientMeta>,
    ) -> DomainResult<AuthenticatedSession> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                // Burn the same work a real verification would
                let _ = bcrypt::hash(password, bcrypt::DEFAULT_COST);
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let password_matches = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !password_matches {
            tracing::debug!(user_id = %user.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }

        if !user.is_active {
            tracing::info!(user_id = %user.id, "login rejected: account disabled");
            return Err(AuthError::AccountDisabled.into());
        }

        let token = self.tokens.issue(user.id, client).await?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok(AuthenticatedSession { token, user })
    }

    /// Exchange the current credential for a fresh one.
    ///
    /// The old credential is unusable from the moment this returns; see
    /// [`TokenService::rotate`] for the atomicity guarantees.
    pub async fn rotate(
        &self,
        credential: &str,
        client: Option<ClientMeta>,
    ) -> DomainResult<IssuedToken> {
        self.tokens.rotate(credential, client).await
    }

    /// End a session by revoking the presented token; with `all` set,
    /// revoke every token of the user.
    pub async fn logout(&self, token_id: Uuid, user_id: Uuid, all: bool) -> DomainResult<()> {
        if all {
            self.tokens.revoke_all_for_user(user_id).await?;
        } else {
            self.tokens.revoke(token_id).await?;
        }
        Ok(())
    }

    /// Resolve the authenticated user's account
    pub async fn current_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                resource: "user".to_string(),
            })
    }
}
