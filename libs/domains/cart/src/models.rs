use domain_catalog::models::Product;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One cart line joined with its product snapshot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub product: Product,
}

/// A user's cart with totals computed at read time
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub user_id: i32,
    pub items: Vec<CartLine>,
    pub total_quantity: i64,
    /// Sum of quantity x price over all lines
    #[schema(value_type = f64)]
    pub total_price: Decimal,
}

impl Cart {
    pub fn from_lines(user_id: i32, items: Vec<CartLine>) -> Self {
        let total_quantity = items.iter().map(|line| i64::from(line.quantity)).sum();
        let total_price = items
            .iter()
            .map(|line| Decimal::from(line.quantity) * line.product.price)
            .sum();

        Self {
            user_id,
            items,
            total_quantity,
            total_price,
        }
    }
}

/// Request payload for adding a product to the cart
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddToCart {
    pub product_id: i32,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Request payload for replacing a line's quantity
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetQuantity {
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}
