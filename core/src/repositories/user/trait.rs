//! User repository trait, scoped to what authentication needs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Lookup interface over user accounts.
///
/// Account creation and administration are handled by the admin modules;
/// the auth flow only ever reads.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by login email.
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with the given email
    /// * `Err(DomainError::Storage)` - Backend failure
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
}
