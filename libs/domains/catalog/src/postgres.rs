//! PostgreSQL implementations of the catalog repositories.
//!
//! The listing pipeline builds one predicate set, counts it, then pages
//! it, so `total` and `items` can never disagree. Ranking uses the
//! weighted `tsv` generated column: `plainto_tsquery` per language for
//! matching, `GREATEST` of the per-language `ts_rank_cd` scores for
//! ordering.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

use crate::{
    entity::{category, product},
    error::{CatalogError, CatalogResult},
    models::{Category, CreateCategory, CreateProduct, Product, ProductFilter, ProductPage},
    repository::{CategoryRepository, ProductRepository},
};

fn db_error(e: sea_orm::DbErr) -> CatalogError {
    CatalogError::Internal(format!("Database error: {}", e))
}

/// PostgreSQL implementation of CategoryRepository using SeaORM
#[derive(Clone)]
pub struct PgCategoryRepository {
    db: DatabaseConnection,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list_active(&self) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .filter(category::Column::IsActive.eq(true))
            .order_by(category::Column::Id, Order::Asc)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn get(&self, id: i32) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(|m| m.into()))
    }

    async fn get_active(&self, id: i32) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id)
            .filter(category::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(|m| m.into()))
    }

    async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        let active_model = category::ActiveModel {
            name: Set(input.name),
            is_active: Set(true),
            parent_id: Set(input.parent_id),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(db_error)?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn update(&self, id: i32, input: CreateCategory) -> CatalogResult<Category> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        let mut active_model: category::ActiveModel = model.into();
        active_model.name = Set(input.name);
        active_model.parent_id = Set(input.parent_id);

        let updated = active_model.update(&self.db).await.map_err(db_error)?;
        Ok(updated.into())
    }

    async fn soft_delete(&self, id: i32) -> CatalogResult<()> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        let mut active_model: category::ActiveModel = model.into();
        active_model.is_active = Set(false);
        active_model.update(&self.db).await.map_err(db_error)?;

        tracing::info!(category_id = id, "Soft-deleted category");
        Ok(())
    }
}

/// PostgreSQL implementation of ProductRepository using SeaORM
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Product row plus its search rank (null without a search term)
#[derive(Debug, FromQueryResult)]
struct RankedProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    image_url: Option<String>,
    stock: i32,
    rating: f64,
    is_active: bool,
    category_id: i32,
    seller_id: i32,
    rank: Option<f32>,
}

impl From<RankedProductRow> for Product {
    fn from(row: RankedProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            stock: row.stock,
            rating: row.rating,
            is_active: row.is_active,
            category_id: row.category_id,
            seller_id: row.seller_id,
        }
    }
}

const SEARCH_MATCH: &str = "(products.tsv @@ plainto_tsquery('english', ?) \
     OR products.tsv @@ plainto_tsquery('russian', ?))";

const SEARCH_RANK: &str = "GREATEST(\
     ts_rank_cd(products.tsv, plainto_tsquery('english', ?)), \
     ts_rank_cd(products.tsv, plainto_tsquery('russian', ?)))";

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self, filter: &ProductFilter) -> CatalogResult<ProductPage> {
        let search = filter.search_term().map(str::to_string);

        let mut condition = Condition::all()
            .add(product::Column::IsActive.eq(true))
            .add(category::Column::IsActive.eq(true));

        if let Some(category_id) = filter.category_id {
            condition = condition.add(product::Column::CategoryId.eq(category_id));
        }
        if let Some(min_price) = filter.min_price {
            condition = condition.add(product::Column::Price.gte(min_price));
        }
        if let Some(max_price) = filter.max_price {
            condition = condition.add(product::Column::Price.lte(max_price));
        }
        if let Some(in_stock) = filter.in_stock {
            condition = condition.add(if in_stock {
                product::Column::Stock.gt(0)
            } else {
                product::Column::Stock.eq(0)
            });
        }
        if let Some(seller_id) = filter.seller_id {
            condition = condition.add(product::Column::SellerId.eq(seller_id));
        }
        if let Some(q) = &search {
            condition =
                condition.add(Expr::cust_with_values(SEARCH_MATCH, [q.clone(), q.clone()]));
        }

        let base = product::Entity::find()
            .join(JoinType::InnerJoin, product::Relation::Category.def())
            .filter(condition);

        // Same predicate set for count and page
        let total = base.clone().count(&self.db).await.map_err(db_error)?;

        let rank_expr = match &search {
            Some(q) => Expr::cust_with_values(SEARCH_RANK, [q.clone(), q.clone()]),
            None => Expr::cust("CAST(NULL AS real)"),
        };

        let mut query = base.column_as(rank_expr, "rank");
        if search.is_some() {
            query = query.order_by(Expr::cust("rank"), Order::Desc);
        }
        query = query.order_by(product::Column::Id, Order::Asc);

        let rows = query
            .offset(filter.offset())
            .limit(filter.page_size)
            .into_model::<RankedProductRow>()
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let ranks = search
            .is_some()
            .then(|| rows.iter().map(|r| r.rank.unwrap_or(0.0)).collect());
        let items = rows.into_iter().map(|r| r.into()).collect();

        Ok(ProductPage {
            items,
            ranks,
            total,
            page: filter.page,
            page_size: filter.page_size,
        })
    }

    async fn create(&self, input: CreateProduct, seller_id: i32) -> CatalogResult<Product> {
        let active_model = product::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            image_url: Set(input.image_url),
            stock: Set(input.stock),
            rating: Set(0.0),
            is_active: Set(true),
            category_id: Set(input.category_id),
            seller_id: Set(seller_id),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(db_error)?;

        tracing::info!(product_id = model.id, seller_id, "Created product");
        Ok(model.into())
    }

    async fn get(&self, id: i32) -> CatalogResult<Option<Product>> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(|m| m.into()))
    }

    async fn get_active(&self, id: i32) -> CatalogResult<Option<Product>> {
        let model = product::Entity::find_by_id(id)
            .join(JoinType::InnerJoin, product::Relation::Category.def())
            .filter(product::Column::IsActive.eq(true))
            .filter(category::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.map(|m| m.into()))
    }

    async fn list_active_by_category(&self, category_id: i32) -> CatalogResult<Vec<Product>> {
        let models = product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .filter(product::Column::IsActive.eq(true))
            .order_by(product::Column::Id, Order::Asc)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: i32, input: CreateProduct) -> CatalogResult<Product> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(CatalogError::ProductNotFound(id))?;

        let mut active_model: product::ActiveModel = model.into();
        active_model.name = Set(input.name);
        active_model.description = Set(input.description);
        active_model.price = Set(input.price);
        active_model.image_url = Set(input.image_url);
        active_model.stock = Set(input.stock);
        active_model.category_id = Set(input.category_id);

        let updated = active_model.update(&self.db).await.map_err(db_error)?;
        Ok(updated.into())
    }

    async fn soft_delete(&self, id: i32) -> CatalogResult<()> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(CatalogError::ProductNotFound(id))?;

        let mut active_model: product::ActiveModel = model.into();
        active_model.is_active = Set(false);
        active_model.update(&self.db).await.map_err(db_error)?;

        tracing::info!(product_id = id, "Soft-deleted product");
        Ok(())
    }

    async fn active_category_exists(&self, category_id: i32) -> CatalogResult<bool> {
        let model = category::Entity::find_by_id(category_id)
            .filter(category::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.is_some())
    }
}
