//! User entity.
//!
//! Only the fields the authentication flow needs live here; user CRUD and
//! role management belong to the admin modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An administrator or staff account that can hold access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,

    /// Login email, unique
    pub email: String,

    /// bcrypt hash of the password; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name shown in the admin UI
    pub display_name: Option<String>,

    /// Disabled accounts cannot log in or keep usable tokens
    pub is_active: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last account update
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with the given email and password hash
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            display_name: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
