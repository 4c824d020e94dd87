use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CreateCategory, CreateProduct, Product, ProductFilter, ProductPage,
};

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All active categories
    async fn list_active(&self) -> CatalogResult<Vec<Category>>;

    /// Get a category by ID, active or not
    async fn get(&self, id: i32) -> CatalogResult<Option<Category>>;

    /// Get an active category by ID
    async fn get_active(&self, id: i32) -> CatalogResult<Option<Category>>;

    /// Create a new category
    async fn create(&self, input: CreateCategory) -> CatalogResult<Category>;

    /// Replace name and parent of an existing category
    async fn update(&self, id: i32, input: CreateCategory) -> CatalogResult<Category>;

    /// Mark a category inactive
    async fn soft_delete(&self, id: i32) -> CatalogResult<()>;
}

/// Repository trait for Product persistence and the listing pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Filtered, optionally ranked, paginated listing.
    ///
    /// The count and the page come from one predicate set, so `total` is
    /// consistent with `items`.
    async fn list(&self, filter: &ProductFilter) -> CatalogResult<ProductPage>;

    /// Create a new product owned by `seller_id`
    async fn create(&self, input: CreateProduct, seller_id: i32) -> CatalogResult<Product>;

    /// Get a product by ID, active or not
    async fn get(&self, id: i32) -> CatalogResult<Option<Product>>;

    /// Get an active product whose category is also active
    async fn get_active(&self, id: i32) -> CatalogResult<Option<Product>>;

    /// Active products of one category, ordered by id
    async fn list_active_by_category(&self, category_id: i32) -> CatalogResult<Vec<Product>>;

    /// Replace the mutable fields of an existing product
    async fn update(&self, id: i32, input: CreateProduct) -> CatalogResult<Product>;

    /// Mark a product inactive
    async fn soft_delete(&self, id: i32) -> CatalogResult<()>;

    /// Whether an active category with this ID exists
    async fn active_category_exists(&self, category_id: i32) -> CatalogResult<bool>;
}

/// In-memory implementation of both catalog repositories (for
/// development/testing). Search ranking approximates the SQL ranker with
/// term frequency: name hits weigh 1.0, description hits 0.4.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    categories: Arc<RwLock<HashMap<i32, Category>>>,
    products: Arc<RwLock<HashMap<i32, Product>>>,
    next_category_id: AtomicI32,
    next_product_id: AtomicI32,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            categories: Arc::new(RwLock::new(HashMap::new())),
            products: Arc::new(RwLock::new(HashMap::new())),
            next_category_id: AtomicI32::new(1),
            next_product_id: AtomicI32::new(1),
        }
    }

    fn rank(product: &Product, terms: &[String]) -> Option<f32> {
        let name = product.name.to_lowercase();
        let description = product
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        let mut score = 0.0f32;
        for term in terms {
            let name_hits = name.matches(term.as_str()).count();
            let desc_hits = description.matches(term.as_str()).count();
            if name_hits == 0 && desc_hits == 0 {
                // plainto_tsquery semantics: every term must match
                return None;
            }
            score += name_hits as f32 + 0.4 * desc_hits as f32;
        }
        Some(score)
    }

    fn matches(product: &Product, filter: &ProductFilter) -> bool {
        if let Some(category_id) = filter.category_id {
            if product.category_id != category_id {
                return false;
            }
        }
        if let Some(min) = filter.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = filter.max_price {
            if product.price > max {
                return false;
            }
        }
        if let Some(in_stock) = filter.in_stock {
            if in_stock != (product.stock > 0) {
                return false;
            }
        }
        if let Some(seller_id) = filter.seller_id {
            if product.seller_id != seller_id {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn list_active(&self) -> CatalogResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = categories
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.id);
        Ok(result)
    }

    async fn get(&self, id: i32) -> CatalogResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn get_active(&self, id: i32) -> CatalogResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).filter(|c| c.is_active).cloned())
    }

    async fn create(&self, input: CreateCategory) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;
        let category = Category {
            id: self.next_category_id.fetch_add(1, Ordering::SeqCst),
            name: input.name,
            is_active: true,
            parent_id: input.parent_id,
        };
        categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn update(&self, id: i32, input: CreateCategory) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;
        let category = categories
            .get_mut(&id)
            .ok_or(CatalogError::CategoryNotFound(id))?;

        category.name = input.name;
        category.parent_id = input.parent_id;
        Ok(category.clone())
    }

    async fn soft_delete(&self, id: i32) -> CatalogResult<()> {
        let mut categories = self.categories.write().await;
        let category = categories
            .get_mut(&id)
            .ok_or(CatalogError::CategoryNotFound(id))?;
        category.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn list(&self, filter: &ProductFilter) -> CatalogResult<ProductPage> {
        let products = self.products.read().await;
        let categories = self.categories.read().await;

        let active_category = |id: i32| categories.get(&id).is_some_and(|c| c.is_active);

        let terms: Option<Vec<String>> = filter.search_term().map(|q| {
            q.to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect()
        });

        let mut matched: Vec<(Product, Option<f32>)> = products
            .values()
            .filter(|p| p.is_active && active_category(p.category_id))
            .filter(|p| Self::matches(p, filter))
            .filter_map(|p| match &terms {
                Some(terms) => Self::rank(p, terms).map(|r| (p.clone(), Some(r))),
                None => Some((p.clone(), None)),
            })
            .collect();

        // Rank desc, id asc tie-break; plain id asc without a search term
        matched.sort_by(|(a, ra), (b, rb)| {
            rb.partial_cmp(ra)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });

        let total = matched.len() as u64;
        let page: Vec<(Product, Option<f32>)> = matched
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.page_size as usize)
            .collect();

        let ranks = terms
            .is_some()
            .then(|| page.iter().map(|(_, r)| r.unwrap_or(0.0)).collect());
        let items = page.into_iter().map(|(p, _)| p).collect();

        Ok(ProductPage {
            items,
            ranks,
            total,
            page: filter.page,
            page_size: filter.page_size,
        })
    }

    async fn create(&self, input: CreateProduct, seller_id: i32) -> CatalogResult<Product> {
        let mut products = self.products.write().await;
        let product = Product {
            id: self.next_product_id.fetch_add(1, Ordering::SeqCst),
            name: input.name,
            description: input.description,
            price: input.price,
            image_url: input.image_url,
            stock: input.stock,
            rating: 0.0,
            is_active: true,
            category_id: input.category_id,
            seller_id,
        };
        products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn get(&self, id: i32) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn get_active(&self, id: i32) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        let categories = self.categories.read().await;
        Ok(products
            .get(&id)
            .filter(|p| p.is_active)
            .filter(|p| categories.get(&p.category_id).is_some_and(|c| c.is_active))
            .cloned())
    }

    async fn list_active_by_category(&self, category_id: i32) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut result: Vec<Product> = products
            .values()
            .filter(|p| p.is_active && p.category_id == category_id)
            .cloned()
            .collect();
        result.sort_by_key(|p| p.id);
        Ok(result)
    }

    async fn update(&self, id: i32, input: CreateProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;

        product.name = input.name;
        product.description = input.description;
        product.price = input.price;
        product.image_url = input.image_url;
        product.stock = input.stock;
        product.category_id = input.category_id;
        Ok(product.clone())
    }

    async fn soft_delete(&self, id: i32) -> CatalogResult<()> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or(CatalogError::ProductNotFound(id))?;
        product.is_active = false;
        Ok(())
    }

    async fn active_category_exists(&self, category_id: i32) -> CatalogResult<bool> {
        let categories = self.categories.read().await;
        Ok(categories.get(&category_id).is_some_and(|c| c.is_active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    async fn seed(catalog: &InMemoryCatalog) -> i32 {
        let category = CategoryRepository::create(
            catalog,
            CreateCategory {
                name: "Electronics".to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap();
        category.id
    }

    fn product(name: &str, description: &str, price: i64, category_id: i32) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: Some(description.to_string()),
            price: Decimal::new(price, 0),
            image_url: None,
            stock: 5,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_listing_without_search_orders_by_id() {
        let catalog = InMemoryCatalog::new();
        let cid = seed(&catalog).await;
        ProductRepository::create(&catalog, product("Phone", "a phone", 100, cid), 1).await.unwrap();
        ProductRepository::create(&catalog, product("Laptop", "a laptop", 900, cid), 1).await.unwrap();

        let page = catalog.list(&ProductFilter::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.ranks.is_none());
        let ids: Vec<i32> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_search_ranks_name_hits_above_description_hits() {
        let catalog = InMemoryCatalog::new();
        let cid = seed(&catalog).await;
        ProductRepository::create(&catalog, product("Cable", "usb charging cable for phone", 5, cid), 1)
            .await
            .unwrap();
        ProductRepository::create(&catalog, product("Phone", "flagship device", 500, cid), 1)
            .await
            .unwrap();

        let filter = ProductFilter {
            search: Some("phone".to_string()),
            ..Default::default()
        };
        let page = catalog.list(&filter).await.unwrap();

        assert_eq!(page.items[0].name, "Phone");
        let ranks = page.ranks.unwrap();
        assert!(ranks[0] > ranks[1]);
    }

    #[tokio::test]
    async fn test_inactive_category_hides_products() {
        let catalog = InMemoryCatalog::new();
        let cid = seed(&catalog).await;
        ProductRepository::create(&catalog, product("Phone", "a phone", 100, cid), 1).await.unwrap();
        CategoryRepository::soft_delete(&catalog, cid).await.unwrap();

        let page = catalog.list(&ProductFilter::default()).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(ProductRepository::get_active(&catalog, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_stock_filter_both_polarities() {
        let catalog = InMemoryCatalog::new();
        let cid = seed(&catalog).await;
        ProductRepository::create(&catalog, product("A", "", 10, cid), 1).await.unwrap();
        let mut sold_out = product("B", "", 10, cid);
        sold_out.stock = 0;
        ProductRepository::create(&catalog, sold_out, 1).await.unwrap();

        let filter = ProductFilter {
            in_stock: Some(true),
            ..Default::default()
        };
        let page = catalog.list(&filter).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "A");

        let filter = ProductFilter {
            in_stock: Some(false),
            ..Default::default()
        };
        let page = catalog.list(&filter).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "B");
    }

    #[tokio::test]
    async fn test_pagination_total_stays_consistent() {
        let catalog = InMemoryCatalog::new();
        let cid = seed(&catalog).await;
        for i in 0..5 {
            ProductRepository::create(&catalog, product(&format!("Item {}", i), "", 10, cid), 1)
                .await
                .unwrap();
        }

        let filter = ProductFilter {
            page: 2,
            page_size: 2,
            ..Default::default()
        };
        let page = catalog.list(&filter).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        let ids: Vec<i32> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }
}
