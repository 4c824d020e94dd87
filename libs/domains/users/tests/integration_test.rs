//! Integration tests for the users domain

use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase};

fn new_user(email: &str, role: Role) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$test$test".to_string(),
        role,
    }
}

#[tokio::test]
async fn test_create_and_fetch_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_fetch");

    let email = builder.email("buyer");
    let created = repo.create(new_user(&email, Role::Buyer)).await.unwrap();
    assert!(created.is_active);
    assert_eq!(created.role, Role::Buyer);

    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.email, email);

    let by_email = repo.get_active_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("duplicate_email");

    let email = builder.email("dup");
    repo.create(new_user(&email, Role::Buyer)).await.unwrap();

    let result = repo.create(new_user(&email, Role::Seller)).await;
    assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
}

#[tokio::test]
async fn test_unknown_email_lookup_is_none() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());

    let result = repo
        .get_active_by_email("nobody@example.com")
        .await
        .unwrap();
    assert!(result.is_none());
}
