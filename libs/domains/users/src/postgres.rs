use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{NewUser, User},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_error(e: sea_orm::DbErr) -> UserError {
    UserError::Internal(format!("Database error: {}", e))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: NewUser) -> UserResult<User> {
        let email = input.email.clone();

        let active_model = entity::ActiveModel {
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role: Set(input.role.to_string()),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            let err_str = e.to_string();
            if err_str.contains("duplicate key") || err_str.contains("unique constraint") {
                UserError::DuplicateEmail(email.clone())
            } else {
                db_error(e)
            }
        })?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(|m| m.into()))
    }

    async fn get_active_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .filter(entity::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(|m| m.into()))
    }
}
