use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Category entity - matches SQL schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
    pub parent_id: Option<i32>,
}

/// DTO for creating or replacing a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 3, max = 50))]
    pub name: String,
    pub parent_id: Option<i32>,
}

/// Product entity - matches SQL schema (tsv column stays DB-side)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock: i32,
    pub rating: f64,
    pub is_active: bool,
    pub category_id: i32,
    pub seller_id: i32,
}

/// DTO for creating or replacing a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_positive_price"))]
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[validate(length(max = 200))]
    pub image_url: Option<String>,
    #[validate(range(min = 0))]
    pub stock: i32,
    pub category_id: i32,
}

fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("price_not_positive").with_message("price must be positive".into()))
    }
}

/// Query filters for the product listing endpoint
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, utoipa::IntoParams)]
pub struct ProductFilter {
    pub category_id: Option<i32>,
    #[schema(value_type = Option<f64>)]
    pub min_price: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
    /// true → stock > 0, false → stock == 0
    pub in_stock: Option<bool>,
    pub seller_id: Option<i32>,
    /// Free-text query matched against name and description
    pub search: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category_id: None,
            min_price: None,
            max_price: None,
            in_stock: None,
            seller_id: None,
            search: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl ProductFilter {
    /// Trimmed search term; whitespace-only input counts as no search.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

/// One page of the product listing.
///
/// `ranks` is null when no search term was given; otherwise it is parallel
/// to `items`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub ranks: Option<Vec<f32>>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}
