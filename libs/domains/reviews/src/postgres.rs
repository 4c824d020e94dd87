//! PostgreSQL implementation of the review repository.
//!
//! Each mutation runs in a transaction that also recomputes the product's
//! rating from its active reviews, so readers never observe a product
//! whose rating disagrees with its reviews.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DbBackend, EntityTrait, JoinType, Order, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Statement, TransactionTrait,
};

use domain_catalog::entity::product;

use crate::{
    entity,
    error::{ReviewError, ReviewResult},
    models::{CreateReview, Review, UpdateReview},
    repository::ReviewRepository,
};

fn db_error(e: sea_orm::DbErr) -> ReviewError {
    ReviewError::Internal(format!("Database error: {}", e))
}

const RECOMPUTE_RATING: &str = r#"
    UPDATE products
    SET rating = COALESCE(
        (SELECT AVG(grade)::float8 FROM reviews
         WHERE product_id = $1 AND is_active = TRUE),
        0.0)
    WHERE id = $1
"#;

/// PostgreSQL implementation of ReviewRepository using SeaORM
#[derive(Clone)]
pub struct PgReviewRepository {
    db: DatabaseConnection,
}

impl PgReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn recompute_rating<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: i32,
    ) -> ReviewResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            RECOMPUTE_RATING,
            [product_id.into()],
        );

        conn.execute_raw(stmt).await.map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn list_active(&self) -> ReviewResult<Vec<Review>> {
        let models = entity::Entity::find()
            .join(JoinType::InnerJoin, entity::Relation::Product.def())
            .filter(entity::Column::IsActive.eq(true))
            .filter(product::Column::IsActive.eq(true))
            .order_by(entity::Column::Id, Order::Asc)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn list_active_for_product(&self, product_id: i32) -> ReviewResult<Vec<Review>> {
        let models = entity::Entity::find()
            .filter(entity::Column::ProductId.eq(product_id))
            .filter(entity::Column::IsActive.eq(true))
            .order_by(entity::Column::Id, Order::Asc)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn get_active(&self, id: i32) -> ReviewResult<Option<Review>> {
        let model = entity::Entity::find_by_id(id)
            .filter(entity::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(|m| m.into()))
    }

    async fn create(&self, input: CreateReview, user_id: i32) -> ReviewResult<Review> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let active_model = entity::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(input.product_id),
            comment: Set(input.comment),
            grade: Set(input.grade),
            comment_date: Set(Utc::now().into()),
            is_active: Set(true),
            ..Default::default()
        };

        let model = active_model.insert(&txn).await.map_err(db_error)?;
        self.recompute_rating(&txn, model.product_id).await?;

        txn.commit().await.map_err(db_error)?;

        tracing::info!(review_id = model.id, user_id, "Created review");
        Ok(model.into())
    }

    async fn update(&self, id: i32, input: UpdateReview) -> ReviewResult<Review> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let model = entity::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(ReviewError::NotFound(id))?;

        let mut active_model: entity::ActiveModel = model.into();
        active_model.grade = Set(input.grade);
        active_model.comment = Set(input.comment);
        active_model.comment_date = Set(Utc::now().into());

        let updated = active_model.update(&txn).await.map_err(db_error)?;
        self.recompute_rating(&txn, updated.product_id).await?;

        txn.commit().await.map_err(db_error)?;
        Ok(updated.into())
    }

    async fn soft_delete(&self, id: i32) -> ReviewResult<()> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let model = entity::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or(ReviewError::NotFound(id))?;
        let product_id = model.product_id;

        let mut active_model: entity::ActiveModel = model.into();
        active_model.is_active = Set(false);
        active_model.update(&txn).await.map_err(db_error)?;

        self.recompute_rating(&txn, product_id).await?;

        txn.commit().await.map_err(db_error)?;

        tracing::info!(review_id = id, "Soft-deleted review");
        Ok(())
    }

    async fn active_product_exists(&self, product_id: i32) -> ReviewResult<bool> {
        let model = product::Entity::find_by_id(product_id)
            .filter(product::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.is_some())
    }
}
