//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, ClientMeta};
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// In-memory token repository for testing.
///
/// Keyed by token digest; the write lock gives the conditional revoke the
/// same atomicity a database row update would.
pub struct MockTokenRepository {
    tokens: Arc<RwLock<HashMap<String, AccessToken>>>,
}

impl MockTokenRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records, revoked and expired ones included
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Whether the repository holds no records
    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    /// Fetch a record by id (test helper)
    pub async fn get_by_id(&self, id: Uuid) -> Option<AccessToken> {
        self.tokens
            .read()
            .await
            .values()
            .find(|t| t.id == id)
            .cloned()
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save_token(&self, token: AccessToken) -> Result<AccessToken, DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_hash).cloned())
    }

    async fn revoke_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.values_mut().find(|t| t.id == id) {
            Some(token) if !token.revoked => {
                token.revoke();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;

        for token in tokens.values_mut() {
            if token.user_id == user_id && !token.revoked {
                token.revoke();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn record_usage(
        &self,
        id: Uuid,
        ip: Option<&str>,
        user_agent: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;

        if let Some(token) = tokens.values_mut().find(|t| t.id == id) {
            let client = ClientMeta::new(ip.map(String::from), user_agent.map(String::from));
            token.touch(&client, at);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::token::DEFAULT_TOKEN_TTL_SECONDS;

    fn token_for(user_id: Uuid, hash: &str) -> AccessToken {
        AccessToken::new(user_id, hash.to_string(), DEFAULT_TOKEN_TTL_SECONDS, None)
    }

    #[tokio::test]
    async fn test_save_and_find_by_hash() {
        let repo = MockTokenRepository::new();
        let token = token_for(Uuid::new_v4(), "hash-1");

        repo.save_token(token.clone()).await.unwrap();

        let found = repo.find_by_hash("hash-1").await.unwrap().unwrap();
        assert_eq!(found.id, token.id);
        assert!(repo.find_by_hash("hash-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_hash_is_rejected() {
        let repo = MockTokenRepository::new();
        repo.save_token(token_for(Uuid::new_v4(), "dup"))
            .await
            .unwrap();

        let result = repo.save_token(token_for(Uuid::new_v4(), "dup")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_revoke_by_id_reports_the_transition_once() {
        let repo = MockTokenRepository::new();
        let token = token_for(Uuid::new_v4(), "hash-r");
        let id = token.id;
        repo.save_token(token).await.unwrap();

        assert!(repo.revoke_by_id(id).await.unwrap());
        assert!(!repo.revoke_by_id(id).await.unwrap());
        assert!(!repo.revoke_by_id(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_all_for_user_skips_other_users() {
        let repo = MockTokenRepository::new();
        let user = Uuid::new_v4();
        repo.save_token(token_for(user, "a")).await.unwrap();
        repo.save_token(token_for(user, "b")).await.unwrap();
        repo.save_token(token_for(Uuid::new_v4(), "c"))
            .await
            .unwrap();

        let revoked = repo.revoke_all_for_user(user).await.unwrap();

        assert_eq!(revoked, 2);
        assert!(!repo.find_by_hash("c").await.unwrap().unwrap().revoked);
    }

    #[tokio::test]
    async fn test_record_usage_updates_telemetry() {
        let repo = MockTokenRepository::new();
        let token = token_for(Uuid::new_v4(), "hash-u");
        let id = token.id;
        repo.save_token(token).await.unwrap();

        let now = Utc::now();
        repo.record_usage(id, Some("10.1.1.1"), Some("test-agent"), now)
            .await
            .unwrap();

        let stored = repo.get_by_id(id).await.unwrap();
        assert_eq!(stored.last_used_at, Some(now));
        assert_eq!(stored.last_ip.as_deref(), Some("10.1.1.1"));
        assert_eq!(stored.last_user_agent.as_deref(), Some("test-agent"));
    }
}
