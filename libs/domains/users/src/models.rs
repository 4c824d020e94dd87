use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User roles
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Buyer,
    Seller,
    Admin,
}

/// User entity - matches SQL schema
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier
    pub id: i32,
    /// User email (unique)
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User role
    pub role: Role,
    /// Account active status
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// User response DTO (without password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// New user ready for insertion (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// DTO for user registration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 4, max = 128))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// DTO for user login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
}

/// DTO for exchanging a refresh token
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair issued on login; refresh issues a lone access token
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
}

impl TokenResponse {
    pub fn pair(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token: Some(refresh_token),
            token_type: "bearer".to_string(),
        }
    }

    pub fn access_only(access_token: String) -> Self {
        Self {
            access_token,
            refresh_token: None,
            token_type: "bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::Buyer.to_string(), "buyer");
        assert_eq!(Role::from_str("seller").unwrap(), Role::Seller);
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn test_register_request_defaults_to_buyer() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"pass"}"#).unwrap();
        assert_eq!(req.role, Role::Buyer);
    }

    #[test]
    fn test_token_response_skips_missing_refresh() {
        let json = serde_json::to_value(TokenResponse::access_only("t".into())).unwrap();
        assert!(json.get("refresh_token").is_none());
        assert_eq!(json["token_type"], "bearer");
    }
}
