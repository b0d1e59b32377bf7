//! Authentication request/response DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sk_core::domain::entities::user::User;
use sk_core::domain::value_objects::auth_session::IssuedToken;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The current plaintext token to rotate
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogoutRequest {
    /// Revoke every session of the user instead of just this one
    #[serde(default)]
    pub all: bool,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}

/// A freshly issued credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The plaintext credential; this response is its only copy
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the credential expires
    pub expires_in: i64,
}

impl From<&IssuedToken> for TokenResponse {
    fn from(issued: &IssuedToken) -> Self {
        Self {
            access_token: issued.plaintext.clone(),
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in_seconds(),
        }
    }
}

/// Successful login: the credential plus the authenticated profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: TokenResponse,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "owner@shopkeep.dev".to_string(),
            password: "pw".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "pw".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_password = LoginRequest {
            email: "owner@shopkeep.dev".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_logout_request_defaults_to_single_session() {
        let parsed: LogoutRequest = serde_json::from_str("{}").unwrap();
        assert!(!parsed.all);

        let all: LogoutRequest = serde_json::from_str(r#"{"all": true}"#).unwrap();
        assert!(all.all);
    }

    #[test]
    fn test_login_response_flattens_the_token() {
        let response = LoginResponse {
            token: TokenResponse {
                access_token: "abc".to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 7200,
            },
            user: UserProfile {
                id: Uuid::new_v4(),
                email: "owner@shopkeep.dev".to_string(),
                display_name: None,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["user"]["email"], "owner@shopkeep.dev");
    }
}
