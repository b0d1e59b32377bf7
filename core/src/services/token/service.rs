//! Main token service implementation

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, ClientMeta, TOKEN_BYTES};
use crate::domain::value_objects::auth_session::IssuedToken;
use crate::errors::{DomainError, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;
use super::telemetry::{UsageRecorder, UsageUpdate};

/// The authority over opaque access tokens.
///
/// Issues, verifies, rotates and revokes credentials against the token
/// store. The plaintext credential exists only in transit: the store holds
/// its SHA-256 digest and nothing else.
pub struct TokenService<R: TokenRepository> {
    repository: Arc<R>,
    config: TokenServiceConfig,
    /// Optional best-effort telemetry sink; absent in most tests
    recorder: Option<UsageRecorder>,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Token repository for persistence
    /// * `config` - Token service configuration
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Self {
        Self {
            repository,
            config,
            recorder: None,
        }
    }

    /// Attaches a usage recorder so successful verifications enqueue
    /// telemetry updates
    pub fn with_recorder(mut self, recorder: UsageRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Issues a new token for a user.
    ///
    /// Generates a 256-bit random credential, persists its digest with an
    /// absolute expiry computed from the configured TTL, and returns the
    /// plaintext exactly once.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The subject the credential authenticates
    /// * `client` - Client metadata recorded at issuance, if known
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - Plaintext plus the persisted record
    /// * `Err(DomainError)` - Persistence failed; no token exists
    pub async fn issue(
        &self,
        user_id: Uuid,
        client: Option<ClientMeta>,
    ) -> Result<IssuedToken, DomainError> {
        let plaintext = Self::generate_credential();
        let token_hash = Self::hash_token(&plaintext);
        let token = AccessToken::new(user_id, token_hash, self.config.token_ttl_seconds, client);

        let record = self.repository.save_token(token).await?;
        tracing::debug!(token_id = %record.id, user_id = %user_id, "issued access token");

        Ok(IssuedToken { plaintext, record })
    }

    /// Verifies a credential and returns its record.
    ///
    /// A token is accepted iff a record matches the digest, it has not
    /// been revoked, and it has not expired. On success, when `usage` is
    /// provided and a recorder is attached, a telemetry update is enqueued;
    /// that update can never block or fail this call.
    ///
    /// # Arguments
    ///
    /// * `plaintext` - The credential presented by the client
    /// * `usage` - Client metadata for the telemetry update
    ///
    /// # Returns
    ///
    /// * `Ok(AccessToken)` - The usable record; `user_id` is the subject
    /// * `Err(DomainError::Token(_))` - Credential rejected
    /// * `Err(DomainError::Storage(_))` - Store unavailable
    pub async fn verify(
        &self,
        plaintext: &str,
        usage: Option<ClientMeta>,
    ) -> Result<AccessToken, DomainError> {
        let token_hash = Self::hash_token(plaintext);

        let token = self
            .repository
            .find_by_hash(&token_hash)
            .await?
            .ok_or(DomainError::Token(TokenError::NotFound))?;

        if token.is_expired() {
            return Err(DomainError::Token(TokenError::Expired));
        }
        if token.revoked {
            return Err(DomainError::Token(TokenError::Revoked));
        }

        if let (Some(recorder), Some(client)) = (&self.recorder, usage) {
            recorder.record(UsageUpdate {
                token_id: token.id,
                ip: client.ip,
                user_agent: client.user_agent,
                seen_at: Utc::now(),
            });
        }

        Ok(token)
    }

    /// Rotates a credential: verifies the old one, revokes it, and issues
    /// a replacement for the same subject.
    ///
    /// The revoke happens before the new plaintext is returned, so there
    /// is no moment at which both credentials validate. The revoke is
    /// conditional in the store; when two callers race on the same old
    /// token, exactly one wins and the others fail with
    /// `TokenError::Revoked`.
    ///
    /// # Arguments
    ///
    /// * `plaintext` - The current credential
    /// * `client` - Client metadata recorded on the replacement token
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - The replacement credential
    /// * `Err(DomainError::Token(_))` - Old credential rejected
    pub async fn rotate(
        &self,
        plaintext: &str,
        client: Option<ClientMeta>,
    ) -> Result<IssuedToken, DomainError> {
        let old = self.verify(plaintext, None).await?;

        // The store's conditional update decides the race: only the caller
        // that performs the false -> true transition may issue.
        if !self.repository.revoke_by_id(old.id).await? {
            return Err(DomainError::Token(TokenError::Revoked));
        }

        let issued = self.issue(old.user_id, client).await?;
        tracing::debug!(
            old_token_id = %old.id,
            new_token_id = %issued.record.id,
            user_id = %old.user_id,
            "rotated access token"
        );

        Ok(issued)
    }

    /// Revokes a token by id. Idempotent; revoking an already revoked or
    /// unknown token succeeds silently.
    pub async fn revoke(&self, token_id: Uuid) -> Result<(), DomainError> {
        self.repository.revoke_by_id(token_id).await?;
        Ok(())
    }

    /// Revokes every token of a user.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of tokens newly revoked
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let count = self.repository.revoke_all_for_user(user_id).await?;
        tracing::info!(user_id = %user_id, revoked = count, "revoked all tokens for user");
        Ok(count)
    }

    /// Generates a fresh credential: 32 bytes from the OS CSPRNG,
    /// hex-encoded
    fn generate_credential() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Hashes a credential for storage and lookup
    pub fn hash_token(plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
