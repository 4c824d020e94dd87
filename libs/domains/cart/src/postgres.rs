//! PostgreSQL implementation of the cart repository.
//!
//! The add path is a single `INSERT ... ON CONFLICT DO UPDATE` against
//! the (user_id, product_id) unique key, so two concurrent adds for the
//! same product merge instead of racing into a duplicate-key failure.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, Order, QueryFilter,
    QueryOrder, Statement,
};

use domain_catalog::entity::product;
use domain_catalog::models::Product;

use crate::{
    entity,
    error::{CartError, CartResult},
    models::CartLine,
    repository::CartRepository,
};

fn db_error(e: sea_orm::DbErr) -> CartError {
    CartError::Internal(format!("Database error: {}", e))
}

const UPSERT_LINE: &str = r#"
    INSERT INTO cart_items (user_id, product_id, quantity)
    VALUES ($1, $2, $3)
    ON CONFLICT (user_id, product_id)
    DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
    RETURNING *
"#;

/// PostgreSQL implementation of CartRepository using SeaORM
#[derive(Clone)]
pub struct PgCartRepository {
    db: DatabaseConnection,
}

impl PgCartRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn line(model: entity::Model, product: Option<product::Model>) -> CartResult<CartLine> {
        let product: Product = product
            .map(Into::into)
            .ok_or(CartError::ProductNotFound(model.product_id))?;

        Ok(CartLine {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            quantity: model.quantity,
            product,
        })
    }

    async fn line_with_product(&self, model: entity::Model) -> CartResult<CartLine> {
        let product = product::Entity::find_by_id(model.product_id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Self::line(model, product)
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn view(&self, user_id: i32) -> CartResult<Vec<CartLine>> {
        let rows = entity::Entity::find()
            .filter(entity::Column::UserId.eq(user_id))
            .find_also_related(product::Entity)
            .order_by(entity::Column::Id, Order::Asc)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        rows.into_iter()
            .map(|(model, product)| Self::line(model, product))
            .collect()
    }

    async fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> CartResult<CartLine> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            UPSERT_LINE,
            [user_id.into(), product_id.into(), quantity.into()],
        );

        let model = entity::Model::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| CartError::Internal("Upsert returned no row".to_string()))?;

        tracing::debug!(user_id, product_id, quantity = model.quantity, "Merged cart line");
        self.line_with_product(model).await
    }

    async fn set_quantity(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> CartResult<CartLine> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE cart_items SET quantity = $3 \
             WHERE user_id = $1 AND product_id = $2 RETURNING *",
            [user_id.into(), product_id.into(), quantity.into()],
        );

        let model = entity::Model::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(CartError::ItemNotFound)?;

        self.line_with_product(model).await
    }

    async fn remove(&self, user_id: i32, product_id: i32) -> CartResult<()> {
        let result = entity::Entity::delete_many()
            .filter(entity::Column::UserId.eq(user_id))
            .filter(entity::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(CartError::ItemNotFound);
        }
        Ok(())
    }

    async fn clear(&self, user_id: i32) -> CartResult<()> {
        entity::Entity::delete_many()
            .filter(entity::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        tracing::debug!(user_id, "Cleared cart");
        Ok(())
    }

    async fn active_product_exists(&self, product_id: i32) -> CartResult<bool> {
        let model = product::Entity::find_by_id(product_id)
            .filter(product::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.is_some())
    }
}
