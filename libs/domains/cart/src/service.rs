use std::sync::Arc;

use crate::error::{CartError, CartResult};
use crate::models::{AddToCart, Cart, CartLine, SetQuantity};
use crate::repository::CartRepository;

/// Service layer for cart business logic
#[derive(Clone)]
pub struct CartService<R: CartRepository> {
    repository: Arc<R>,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn get_cart(&self, user_id: i32) -> CartResult<Cart> {
        let items = self.repository.view(user_id).await?;
        Ok(Cart::from_lines(user_id, items))
    }

    pub async fn add_item(&self, user_id: i32, input: AddToCart) -> CartResult<CartLine> {
        self.require_active_product(input.product_id).await?;
        self.repository
            .add(user_id, input.product_id, input.quantity)
            .await
    }

    pub async fn set_quantity(
        &self,
        user_id: i32,
        product_id: i32,
        input: SetQuantity,
    ) -> CartResult<CartLine> {
        self.require_active_product(product_id).await?;
        self.repository
            .set_quantity(user_id, product_id, input.quantity)
            .await
    }

    pub async fn remove_item(&self, user_id: i32, product_id: i32) -> CartResult<()> {
        self.repository.remove(user_id, product_id).await
    }

    pub async fn clear(&self, user_id: i32) -> CartResult<()> {
        self.repository.clear(user_id).await
    }

    async fn require_active_product(&self, product_id: i32) -> CartResult<()> {
        if !self.repository.active_product_exists(product_id).await? {
            return Err(CartError::ProductNotFound(product_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCart, MockCartRepository};
    use domain_catalog::models::Product;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn product(id: i32, price: Decimal) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: None,
            price,
            image_url: None,
            stock: 10,
            rating: 0.0,
            is_active: true,
            category_id: 1,
            seller_id: 1,
        }
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_not_found() {
        let mut repo = MockCartRepository::new();
        repo.expect_active_product_exists()
            .with(eq(42))
            .returning(|_| Ok(false));
        repo.expect_add().never();

        let service = CartService::new(repo);
        let result = service
            .add_item(
                1,
                AddToCart {
                    product_id: 42,
                    quantity: 1,
                },
            )
            .await;
        assert!(matches!(result, Err(CartError::ProductNotFound(42))));
    }

    #[tokio::test]
    async fn test_cart_totals_reflect_merged_adds() {
        let cart = InMemoryCart::new();
        cart.seed_product(product(7, Decimal::new(1000, 2))).await;

        let service = CartService::new(cart);
        service
            .add_item(
                1,
                AddToCart {
                    product_id: 7,
                    quantity: 2,
                },
            )
            .await
            .unwrap();
        service
            .add_item(
                1,
                AddToCart {
                    product_id: 7,
                    quantity: 3,
                },
            )
            .await
            .unwrap();

        let view = service.get_cart(1).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_quantity, 5);
        assert_eq!(view.total_price, Decimal::new(5000, 2));
    }

    #[tokio::test]
    async fn test_set_quantity_for_absent_line() {
        let cart = InMemoryCart::new();
        cart.seed_product(product(7, Decimal::ONE)).await;

        let service = CartService::new(cart);
        let result = service
            .set_quantity(1, 7, SetQuantity { quantity: 4 })
            .await;
        assert!(matches!(result, Err(CartError::ItemNotFound)));
    }

    #[tokio::test]
    async fn test_set_quantity_replaces_instead_of_adding() {
        let cart = InMemoryCart::new();
        cart.seed_product(product(7, Decimal::ONE)).await;

        let service = CartService::new(cart);
        service
            .add_item(
                1,
                AddToCart {
                    product_id: 7,
                    quantity: 2,
                },
            )
            .await
            .unwrap();
        let line = service
            .set_quantity(1, 7, SetQuantity { quantity: 9 })
            .await
            .unwrap();
        assert_eq!(line.quantity, 9);
    }

    #[tokio::test]
    async fn test_clear_then_view_is_empty() {
        let cart = InMemoryCart::new();
        cart.seed_product(product(7, Decimal::ONE)).await;

        let service = CartService::new(cart);
        service
            .add_item(
                1,
                AddToCart {
                    product_id: 7,
                    quantity: 1,
                },
            )
            .await
            .unwrap();

        service.clear(1).await.unwrap();
        service.clear(1).await.unwrap();

        let view = service.get_cart(1).await.unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.total_price, Decimal::ZERO);
    }
}
