use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, input: NewUser) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>>;

    /// Get an active user by email
    async fn get_active_by_email(&self, email: &str) -> UserResult<Option<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<i32, User>>>,
    next_id: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        let email_exists = users
            .values()
            .any(|u| u.email.to_lowercase() == input.email.to_lowercase());

        if email_exists {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: input.email,
            password_hash: input.password_hash,
            role: input.role,
            is_active: true,
            created_at: chrono::Utc::now(),
        };

        users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_active_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.is_active && u.email.to_lowercase() == email.to_lowercase())
            .cloned();
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hashed".to_string(),
            role: Role::Buyer,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(new_user("test@example.com")).await.unwrap();
        assert_eq!(created.email, "test@example.com");
        assert!(created.is_active);

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_get_active_by_email_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("test@example.com")).await.unwrap();

        let fetched = repo.get_active_by_email("TEST@EXAMPLE.COM").await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("test@example.com")).await.unwrap();

        let result = repo.create(new_user("test@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("a@example.com")).await.unwrap();
        let b = repo.create(new_user("b@example.com")).await.unwrap();
        assert_eq!(b.id, a.id + 1);
    }
}
