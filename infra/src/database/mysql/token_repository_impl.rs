//! MySQL implementation of the TokenRepository trait.
//!
//! Persists access tokens with SQLx. The table carries a unique index on
//! `token_hash`, and the conditional revoke is a single `UPDATE ... WHERE
//! revoked = FALSE`, so the row-level atomicity the token authority's
//! rotation relies on comes straight from the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sk_core::domain::entities::token::AccessToken;
use sk_core::errors::DomainError;
use sk_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an AccessToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<AccessToken, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| storage_error("read id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| storage_error("read user_id", e))?;

        Ok(AccessToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| storage_error("read token_hash", e))?,
            revoked: row
                .try_get("revoked")
                .map_err(|e| storage_error("read revoked", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| storage_error("read created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| storage_error("read expires_at", e))?,
            last_used_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_used_at")
                .map_err(|e| storage_error("read last_used_at", e))?,
            last_ip: row
                .try_get("last_ip")
                .map_err(|e| storage_error("read last_ip", e))?,
            last_user_agent: row
                .try_get("last_user_agent")
                .map_err(|e| storage_error("read last_user_agent", e))?,
        })
    }
}

fn storage_error(action: &str, error: impl std::fmt::Display) -> DomainError {
    DomainError::Storage {
        message: format!("Failed to {}: {}", action, error),
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save_token(&self, token: AccessToken) -> Result<AccessToken, DomainError> {
        let query = r#"
            INSERT INTO access_tokens (
                id, user_id, token_hash, revoked, created_at, expires_at,
                last_used_at, last_ip, last_user_agent
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(token.revoked)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.last_used_at)
            .bind(&token.last_ip)
            .bind(&token.last_user_agent)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // The unique index on token_hash decides duplicates
                if e.as_database_error()
                    .map(|d| d.is_unique_violation())
                    .unwrap_or(false)
                {
                    DomainError::Validation {
                        message: "Token already exists".to_string(),
                    }
                } else {
                    storage_error("save access token", e)
                }
            })?;

        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, revoked, created_at, expires_at,
                   last_used_at, last_ip, last_user_agent
            FROM access_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("find access token", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn revoke_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE access_tokens
            SET revoked = TRUE
            WHERE id = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("revoke access token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE access_tokens
            SET revoked = TRUE
            WHERE user_id = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("revoke user tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn record_usage(
        &self,
        id: Uuid,
        ip: Option<&str>,
        user_agent: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let query = r#"
            UPDATE access_tokens
            SET last_used_at = ?,
                last_ip = COALESCE(?, last_ip),
                last_user_agent = COALESCE(?, last_user_agent)
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(at)
            .bind(ip)
            .bind(user_agent)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("record token usage", e))?;

        Ok(())
    }
}
