//! Access token entity for the opaque bearer-token scheme.
//!
//! A token is a random credential with no embedded structure; validity is
//! decided solely by server-side lookup. Only the SHA-256 digest of the
//! credential is ever persisted - the plaintext leaves the server exactly
//! once, in the response that issued it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access token time-to-live (2 hours)
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 7200;

/// Bytes of entropy in a freshly generated credential (256 bits)
pub const TOKEN_BYTES: usize = 32;

/// Client metadata captured alongside token activity.
///
/// Telemetry only: these values never participate in the authorization
/// decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMeta {
    /// Client network address as reported by the transport layer
    pub ip: Option<String>,

    /// Client User-Agent header
    pub user_agent: Option<String>,
}

impl ClientMeta {
    /// Create metadata from optional ip / user-agent strings
    pub fn new(ip: Option<String>, user_agent: Option<String>) -> Self {
        Self { ip, user_agent }
    }
}

/// Access token entity stored in the database.
///
/// A token is *usable* iff it has not been revoked and has not expired.
/// That predicate is the single source of truth for admission; the
/// telemetry fields (`last_used_at`, `last_ip`, `last_user_agent`) are
/// eventually consistent and never override it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Unique identifier for the token, assigned at creation
    pub id: Uuid,

    /// User this token belongs to; many tokens may reference one user
    pub user_id: Uuid,

    /// SHA-256 hex digest of the credential; unique across all tokens
    pub token_hash: String,

    /// Whether the token has been revoked (false -> true only, never back)
    pub revoked: bool,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Absolute expiry timestamp, immutable once set
    pub expires_at: DateTime<Utc>,

    /// Timestamp of the last successful verification, best effort
    pub last_used_at: Option<DateTime<Utc>>,

    /// Network address seen on the last successful verification
    pub last_ip: Option<String>,

    /// User-Agent seen on the last successful verification
    pub last_user_agent: Option<String>,
}

impl AccessToken {
    /// Creates a new access token record for a user.
    ///
    /// # Arguments
    /// * `user_id` - The owning user's UUID
    /// * `token_hash` - SHA-256 hex digest of the plaintext credential
    /// * `ttl_seconds` - Lifetime of the token from now
    /// * `client` - Client metadata recorded at issuance, if known
    pub fn new(
        user_id: Uuid,
        token_hash: String,
        ttl_seconds: i64,
        client: Option<ClientMeta>,
    ) -> Self {
        let now = Utc::now();
        let client = client.unwrap_or_default();

        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            revoked: false,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
            last_used_at: None,
            last_ip: client.ip,
            last_user_agent: client.user_agent,
        }
    }

    /// Checks if the token has passed its expiry timestamp
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks if the token is usable: not revoked and not expired
    pub fn is_usable(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    /// Revokes the token. One-way; there is no un-revoke.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }

    /// Records a successful use of the token
    pub fn touch(&mut self, client: &ClientMeta, at: DateTime<Utc>) {
        self.last_used_at = Some(at);
        if client.ip.is_some() {
            self.last_ip = client.ip.clone();
        }
        if client.user_agent.is_some() {
            self.last_user_agent = client.user_agent.clone();
        }
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
