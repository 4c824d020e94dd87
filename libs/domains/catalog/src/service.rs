use std::sync::Arc;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::media::MediaStore;
use crate::models::{
    Category, CreateCategory, CreateProduct, Product, ProductFilter, ProductPage,
};
use crate::repository::{CategoryRepository, ProductRepository};

/// Service layer for category business logic
#[derive(Clone)]
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.repository.list_active().await
    }

    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        if let Some(parent_id) = input.parent_id {
            self.require_active_parent(parent_id).await?;
        }
        self.repository.create(input).await
    }

    pub async fn update_category(&self, id: i32, input: CreateCategory) -> CatalogResult<Category> {
        self.repository
            .get_active(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        if let Some(parent_id) = input.parent_id {
            self.require_active_parent(parent_id).await?;
            // Single-level guard only; deeper cycles are not detected
            if parent_id == id {
                return Err(CatalogError::Validation(
                    "Category cannot be its own parent".to_string(),
                ));
            }
        }

        self.repository.update(id, input).await
    }

    pub async fn delete_category(&self, id: i32) -> CatalogResult<()> {
        let category = self
            .repository
            .get(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        if !category.is_active {
            return Err(CatalogError::Validation(
                "Category already marked as inactive".to_string(),
            ));
        }

        self.repository.soft_delete(id).await
    }

    async fn require_active_parent(&self, parent_id: i32) -> CatalogResult<()> {
        self.repository
            .get_active(parent_id)
            .await?
            .ok_or(CatalogError::InvalidCategory(parent_id))?;
        Ok(())
    }
}

/// Service layer for product business logic
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    media: Arc<dyn MediaStore>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, media: Arc<dyn MediaStore>) -> Self {
        Self {
            repository: Arc::new(repository),
            media,
        }
    }

    /// Filtered/ranked/paginated listing. Boundary validation happens
    /// before any query is issued.
    pub async fn list_products(&self, filter: ProductFilter) -> CatalogResult<ProductPage> {
        filter
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(CatalogError::InvalidPriceRange);
            }
        }

        self.repository.list(&filter).await
    }

    pub async fn create_product(
        &self,
        seller_id: i32,
        input: CreateProduct,
    ) -> CatalogResult<Product> {
        self.require_active_category(input.category_id).await?;
        self.repository.create(input, seller_id).await
    }

    pub async fn get_product(&self, id: i32) -> CatalogResult<Product> {
        self.repository
            .get_active(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    pub async fn products_by_category(&self, category_id: i32) -> CatalogResult<Vec<Product>> {
        self.require_active_category(category_id).await?;
        self.repository.list_active_by_category(category_id).await
    }

    pub async fn update_product(
        &self,
        seller_id: i32,
        id: i32,
        input: CreateProduct,
    ) -> CatalogResult<Product> {
        let existing = self.require_own_product(seller_id, id).await?;
        self.require_active_category(input.category_id).await?;

        let replaced_image = match (&existing.image_url, &input.image_url) {
            (Some(old), new) if new.as_deref() != Some(old) => Some(old.clone()),
            _ => None,
        };

        let updated = self.repository.update(id, input).await?;

        if let Some(old_url) = replaced_image {
            self.media.remove(&old_url).await?;
        }

        Ok(updated)
    }

    pub async fn delete_product(&self, seller_id: i32, id: i32) -> CatalogResult<Product> {
        let product = self.require_own_product(seller_id, id).await?;

        if let Some(url) = &product.image_url {
            self.media.remove(url).await?;
        }

        self.repository.soft_delete(id).await?;

        Ok(Product {
            is_active: false,
            ..product
        })
    }

    async fn require_own_product(&self, seller_id: i32, id: i32) -> CatalogResult<Product> {
        let product = self
            .repository
            .get_active(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        if product.seller_id != seller_id {
            return Err(CatalogError::NotOwner);
        }

        Ok(product)
    }

    async fn require_active_category(&self, category_id: i32) -> CatalogResult<()> {
        if !self.repository.active_category_exists(category_id).await? {
            return Err(CatalogError::InvalidCategory(category_id));
        }
        Ok(())
    }
}
