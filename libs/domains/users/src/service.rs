use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::JwtAuth;
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, RegisterRequest, Role, TokenResponse, UserResponse};
use crate::repository::UserRepository;

/// Service layer for user registration and authentication
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Register a new buyer or seller account
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        if input.role == Role::Admin {
            return Err(UserError::Validation(
                "Role must be 'buyer' or 'seller'".to_string(),
            ));
        }

        let password_hash = self.hash_password(&input.password)?;

        let created = self
            .repository
            .create(NewUser {
                email: input.email,
                password_hash,
                role: input.role,
            })
            .await?;

        Ok(created.into())
    }

    /// Verify credentials and issue an access/refresh token pair
    pub async fn login(&self, email: &str, password: &str) -> UserResult<TokenResponse> {
        let user = self
            .repository
            .get_active_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        let role = user.role.to_string();
        let access = self
            .jwt
            .create_access_token(user.id, &user.email, &role)
            .map_err(|e| UserError::Internal(e.to_string()))?;
        let refresh = self
            .jwt
            .create_refresh_token(user.id, &user.email, &role)
            .map_err(|e| UserError::Internal(e.to_string()))?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(TokenResponse::pair(access, refresh))
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// The user is re-read so deactivated accounts stop refreshing
    /// immediately even while their token is still within its TTL.
    pub async fn refresh(&self, refresh_token: &str) -> UserResult<TokenResponse> {
        let claims = self
            .jwt
            .verify_token(refresh_token)
            .map_err(|_| UserError::InvalidCredentials)?;

        let user = self
            .repository
            .get_active_by_email(&claims.sub)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let access = self
            .jwt
            .create_access_token(user.id, &user.email, &user.role.to_string())
            .map_err(|e| UserError::Internal(e.to_string()))?;

        Ok(TokenResponse::access_only(access))
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};
    use axum_helpers::JwtConfig;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(
            "test-secret-that-is-long-enough-000000",
        ))
    }

    fn register_request(role: Role) -> RegisterRequest {
        RegisterRequest {
            email: "buyer@example.com".to_string(),
            password: "secret".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let service = UserService::new(InMemoryUserRepository::new(), jwt());

        let user = service.register(register_request(Role::Buyer)).await.unwrap();
        assert_eq!(user.email, "buyer@example.com");
        assert_eq!(user.role, Role::Buyer);
    }

    #[tokio::test]
    async fn test_register_rejects_admin_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let service = UserService::new(repo, jwt());
        let result = service.register(register_request(Role::Admin)).await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_and_refresh_round_trip() {
        let service = UserService::new(InMemoryUserRepository::new(), jwt());
        service.register(register_request(Role::Seller)).await.unwrap();

        let tokens = service.login("buyer@example.com", "secret").await.unwrap();
        assert!(tokens.refresh_token.is_some());

        let refreshed = service
            .refresh(tokens.refresh_token.as_deref().unwrap())
            .await
            .unwrap();
        assert!(refreshed.refresh_token.is_none());
        assert_eq!(refreshed.token_type, "bearer");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = UserService::new(InMemoryUserRepository::new(), jwt());
        service.register(register_request(Role::Buyer)).await.unwrap();

        let result = service.login("buyer@example.com", "wrong").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_active_by_email()
            .returning(|_| Ok(None));

        let service = UserService::new(repo, jwt());
        let result = service.login("ghost@example.com", "secret").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_garbage_token() {
        let service = UserService::new(InMemoryUserRepository::new(), jwt());
        let result = service.refresh("not-a-jwt").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_deactivated_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().returning(|input| {
            Ok(User {
                id: 1,
                email: input.email,
                password_hash: input.password_hash,
                role: input.role,
                is_active: true,
                created_at: chrono::Utc::now(),
            })
        });
        // Active lookup finds nobody once the account is deactivated
        repo.expect_get_active_by_email().returning(|_| Ok(None));

        let service = UserService::new(repo, jwt());
        service.register(register_request(Role::Buyer)).await.unwrap();

        let token = jwt()
            .create_refresh_token(1, "buyer@example.com", "buyer")
            .unwrap();
        let result = service.refresh(&token).await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }
}
