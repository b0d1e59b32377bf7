//! Token repository trait defining the interface for access token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::AccessToken;
use crate::errors::DomainError;

/// Repository trait for AccessToken entity persistence operations.
///
/// The token authority is the only writer of token records; this trait is
/// the narrow surface it needs. Implementations must provide a uniqueness
/// constraint on `token_hash` and row-level atomicity for the conditional
/// revoke - rotation correctness rests on it.
///
/// Every method may fail with `DomainError::Storage` on a transient
/// backend failure; callers decide whether to retry.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new token record.
    ///
    /// # Arguments
    /// * `token` - The AccessToken entity to persist
    ///
    /// # Returns
    /// * `Ok(AccessToken)` - The saved token
    /// * `Err(DomainError::Validation)` - A record with the same hash exists
    /// * `Err(DomainError::Storage)` - Backend failure
    async fn save_token(&self, token: AccessToken) -> Result<AccessToken, DomainError>;

    /// Find a token by the digest of its credential.
    ///
    /// # Returns
    /// * `Ok(Some(AccessToken))` - Record found (may be revoked or expired)
    /// * `Ok(None)` - No record with the given digest
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, DomainError>;

    /// Mark a token revoked iff it is not revoked yet.
    ///
    /// The check and the write must be a single atomic step: under
    /// concurrent calls for the same id, exactly one caller observes
    /// `true`. Calling it on an already revoked token is a no-op.
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the false -> true transition
    /// * `Ok(false)` - Token was already revoked, or no such token
    async fn revoke_by_id(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Mark every token of a user revoked.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens newly revoked
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Record a successful use of a token.
    ///
    /// Telemetry only: updates `last_used_at` and, when present, the
    /// client address and user agent. Never consulted for authorization.
    async fn record_usage(
        &self,
        id: Uuid,
        ip: Option<&str>,
        user_agent: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}
