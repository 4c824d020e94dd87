use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT token time-to-live constants
pub const ACCESS_TOKEN_TTL: i64 = 900; // 15 minutes
pub const REFRESH_TOKEN_TTL: i64 = 604800; // 7 days

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,  // Subject (user email)
    pub id: i32,      // User id
    pub role: String, // User role (buyer | seller | admin)
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
    pub jti: String,  // JWT ID
}

/// Stateless JWT issuer/verifier (HS256).
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    /// Create a new JWT auth instance.
    ///
    /// # Example
    /// ```ignore
    /// use axum_helpers::{JwtAuth, JwtConfig};
    /// use core_config::FromEnv;
    ///
    /// let config = JwtConfig::from_env()?;
    /// let jwt = JwtAuth::new(&config);
    /// ```
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
        }
    }

    /// Create access token (15 min)
    pub fn create_access_token(&self, user_id: i32, email: &str, role: &str) -> eyre::Result<String> {
        self.create_token(user_id, email, role, ACCESS_TOKEN_TTL)
    }

    /// Create refresh token (7 days)
    pub fn create_refresh_token(
        &self,
        user_id: i32,
        email: &str,
        role: &str,
    ) -> eyre::Result<String> {
        self.create_token(user_id, email, role, REFRESH_TOKEN_TTL)
    }

    /// Create JWT token with specified TTL
    fn create_token(
        &self,
        user_id: i32,
        email: &str,
        role: &str,
        ttl_seconds: i64,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_seconds)).timestamp();
        let iat = now.timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = JwtClaims {
            sub: email.to_string(),
            id: user_id,
            role: role.to_string(),
            exp,
            iat,
            jti,
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify JWT token signature and decode claims
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("test-secret-that-is-32-characters!!"))
    }

    #[test]
    fn test_token_round_trip() {
        let auth = auth();
        let token = auth.create_access_token(7, "buyer@example.com", "buyer").unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "buyer@example.com");
        assert_eq!(claims.id, 7);
        assert_eq!(claims.role, "buyer");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let auth = auth();
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-32-chars!!!!!"));

        let token = auth.create_access_token(1, "a@example.com", "seller").unwrap();
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(auth().verify_token("not.a.jwt").is_err());
    }

    #[test]
    fn test_refresh_token_lives_longer() {
        let auth = auth();
        let access = auth.create_access_token(1, "a@example.com", "buyer").unwrap();
        let refresh = auth.create_refresh_token(1, "a@example.com", "buyer").unwrap();

        let access_claims = auth.verify_token(&access).unwrap();
        let refresh_claims = auth.verify_token(&refresh).unwrap();
        assert!(refresh_claims.exp > access_claims.exp);
    }
}
