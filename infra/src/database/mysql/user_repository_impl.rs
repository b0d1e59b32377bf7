//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sk_core::domain::entities::user::User;
use sk_core::errors::DomainError;
use sk_core::repositories::UserRepository;

const SELECT_COLUMNS: &str =
    "id, email, password_hash, display_name, is_active, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(|e| storage_error("read id", e))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            email: row
                .try_get("email")
                .map_err(|e| storage_error("read email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| storage_error("read password_hash", e))?,
            display_name: row
                .try_get("display_name")
                .map_err(|e| storage_error("read display_name", e))?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| storage_error("read is_active", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| storage_error("read created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| storage_error("read updated_at", e))?,
        })
    }
}

fn storage_error(action: &str, error: impl std::fmt::Display) -> DomainError {
    DomainError::Storage {
        message: format!("Failed to {}: {}", action, error),
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE email = ? LIMIT 1",
            SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("find user by email", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("find user by id", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}
