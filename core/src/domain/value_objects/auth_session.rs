//! Results of token issuance and login.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::AccessToken;
use crate::domain::entities::user::User;

/// A freshly issued credential together with its persisted record.
///
/// `plaintext` is the only copy of the credential that will ever exist;
/// it is handed to the caller once and cannot be recovered afterwards.
/// Deliberately not `Serialize` and without a `Debug` passthrough of the
/// secret - handlers copy the plaintext into a response DTO explicitly.
#[derive(Clone)]
pub struct IssuedToken {
    /// The raw credential, returned to the client exactly once
    pub plaintext: String,

    /// The stored record (contains only the digest)
    pub record: AccessToken,
}

impl IssuedToken {
    /// When the credential stops being valid
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.record.expires_at
    }

    /// Seconds until the credential expires, floored at zero
    pub fn expires_in_seconds(&self) -> i64 {
        self.record.time_until_expiration().num_seconds().max(0)
    }

    /// The subject the credential authenticates
    pub fn user_id(&self) -> Uuid {
        self.record.user_id
    }
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("plaintext", &"<redacted>")
            .field("record", &self.record)
            .finish()
    }
}

/// Outcome of a successful login: the issued credential plus the
/// authenticated user.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// The issued credential
    pub token: IssuedToken,

    /// The user that logged in
    pub user: User,
}
