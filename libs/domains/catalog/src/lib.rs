//! Catalog Domain
//!
//! This module provides categories and products, including the product
//! listing pipeline: conjunctive filters, weighted full-text search
//! ranking, and offset pagination with a consistent total count.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, ownership and category checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod media;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use handlers::{CategoriesApiDoc, ProductsApiDoc};
pub use media::{LocalMediaStore, MediaStore};
pub use models::{
    Category, CreateCategory, CreateProduct, Product, ProductFilter, ProductPage,
};
pub use postgres::{PgCategoryRepository, PgProductRepository};
pub use repository::{
    CategoryRepository, InMemoryCatalog, ProductRepository,
};
pub use service::{CategoryService, ProductService};
