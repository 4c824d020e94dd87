use async_trait::async_trait;
use domain_catalog::models::Product;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CartError, CartResult};
use crate::models::CartLine;

/// Repository trait for cart persistence.
///
/// `add` must be an atomic insert-or-increment on the (user, product)
/// key: any sequence of adds leaves exactly one line whose quantity is
/// the sum of the added quantities, even under concurrency.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// The user's cart lines joined with their products, ordered by id
    async fn view(&self, user_id: i32) -> CartResult<Vec<CartLine>>;

    /// Insert a line or increment the existing one, returning the merged line
    async fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> CartResult<CartLine>;

    /// Replace the quantity of an existing line
    async fn set_quantity(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> CartResult<CartLine>;

    /// Remove one line; `ItemNotFound` if the user has no such line
    async fn remove(&self, user_id: i32, product_id: i32) -> CartResult<()>;

    /// Remove all of the user's lines. Idempotent.
    async fn clear(&self, user_id: i32) -> CartResult<()>;

    /// Whether an active product with this ID exists
    async fn active_product_exists(&self, product_id: i32) -> CartResult<bool>;
}

#[derive(Debug, Default)]
struct CartState {
    // (user_id, product_id) -> (line id, quantity)
    items: HashMap<(i32, i32), (i32, i32)>,
    products: HashMap<i32, Product>,
    next_id: i32,
}

/// In-memory implementation for development/testing. A single write lock
/// serializes merges, mirroring what the unique key gives PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryCart {
    state: Arc<RwLock<CartState>>,
}

impl InMemoryCart {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(CartState {
                next_id: 1,
                ..Default::default()
            })),
        }
    }

    pub async fn seed_product(&self, product: Product) {
        self.state
            .write()
            .await
            .products
            .insert(product.id, product);
    }

    fn line(state: &CartState, user_id: i32, product_id: i32) -> CartResult<CartLine> {
        let (id, quantity) = *state
            .items
            .get(&(user_id, product_id))
            .ok_or(CartError::ItemNotFound)?;
        let product = state
            .products
            .get(&product_id)
            .cloned()
            .ok_or(CartError::ProductNotFound(product_id))?;

        Ok(CartLine {
            id,
            user_id,
            product_id,
            quantity,
            product,
        })
    }
}

#[async_trait]
impl CartRepository for InMemoryCart {
    async fn view(&self, user_id: i32) -> CartResult<Vec<CartLine>> {
        let state = self.state.read().await;
        let mut lines: Vec<CartLine> = state
            .items
            .keys()
            .filter(|(uid, _)| *uid == user_id)
            .map(|&(uid, pid)| Self::line(&state, uid, pid))
            .collect::<CartResult<_>>()?;
        lines.sort_by_key(|line| line.id);
        Ok(lines)
    }

    async fn add(&self, user_id: i32, product_id: i32, quantity: i32) -> CartResult<CartLine> {
        let mut state = self.state.write().await;

        match state.items.get_mut(&(user_id, product_id)) {
            Some((_, existing)) => *existing += quantity,
            None => {
                let id = state.next_id;
                state.next_id += 1;
                state.items.insert((user_id, product_id), (id, quantity));
            }
        }

        Self::line(&state, user_id, product_id)
    }

    async fn set_quantity(
        &self,
        user_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> CartResult<CartLine> {
        let mut state = self.state.write().await;

        let (_, existing) = state
            .items
            .get_mut(&(user_id, product_id))
            .ok_or(CartError::ItemNotFound)?;
        *existing = quantity;

        Self::line(&state, user_id, product_id)
    }

    async fn remove(&self, user_id: i32, product_id: i32) -> CartResult<()> {
        self.state
            .write()
            .await
            .items
            .remove(&(user_id, product_id))
            .map(|_| ())
            .ok_or(CartError::ItemNotFound)
    }

    async fn clear(&self, user_id: i32) -> CartResult<()> {
        self.state
            .write()
            .await
            .items
            .retain(|(uid, _), _| *uid != user_id);
        Ok(())
    }

    async fn active_product_exists(&self, product_id: i32) -> CartResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .products
            .get(&product_id)
            .is_some_and(|p| p.is_active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: i32) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: None,
            price: Decimal::new(500, 2),
            image_url: None,
            stock: 10,
            rating: 0.0,
            is_active: true,
            category_id: 1,
            seller_id: 1,
        }
    }

    #[tokio::test]
    async fn test_repeated_adds_merge_into_one_line() {
        let cart = InMemoryCart::new();
        cart.seed_product(product(7)).await;

        cart.add(1, 7, 2).await.unwrap();
        let merged = cart.add(1, 7, 3).await.unwrap();

        assert_eq!(merged.quantity, 5);
        let lines = cart.view(1).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_carts_are_per_user() {
        let cart = InMemoryCart::new();
        cart.seed_product(product(7)).await;

        cart.add(1, 7, 2).await.unwrap();
        cart.add(2, 7, 1).await.unwrap();

        assert_eq!(cart.view(1).await.unwrap()[0].quantity, 2);
        assert_eq!(cart.view(2).await.unwrap()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let cart = InMemoryCart::new();
        cart.seed_product(product(7)).await;
        cart.add(1, 7, 2).await.unwrap();

        cart.clear(1).await.unwrap();
        cart.clear(1).await.unwrap();
        assert!(cart.view(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_line_is_not_found() {
        let cart = InMemoryCart::new();
        let result = cart.remove(1, 7).await;
        assert!(matches!(result, Err(CartError::ItemNotFound)));
    }

    #[tokio::test]
    async fn test_view_orders_lines_by_id() {
        let cart = InMemoryCart::new();
        cart.seed_product(product(7)).await;
        cart.seed_product(product(8)).await;
        cart.seed_product(product(9)).await;

        cart.add(1, 9, 1).await.unwrap();
        cart.add(1, 7, 1).await.unwrap();
        cart.add(1, 8, 1).await.unwrap();

        let ids: Vec<i32> = cart.view(1).await.unwrap().iter().map(|l| l.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
