//! Reviews Domain
//!
//! Buyer reviews of products, with the product rating kept in sync: every
//! review mutation recomputes the product's rating (mean grade of active
//! reviews, 0.0 when none) in the same unit of work.
//!
//! # Features
//!
//! - Buyers review active products (grade 1-5, optional comment)
//! - Author-only edits, refreshing the comment date
//! - Admin-only soft delete
//! - Synchronous rating aggregation, transactional in PostgreSQL

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ReviewError, ReviewResult};
pub use handlers::{ApiDoc, ProductReviewsApiDoc};
pub use models::{CreateReview, Review, UpdateReview};
pub use postgres::PgReviewRepository;
pub use repository::{InMemoryReviewStore, ReviewRepository};
pub use service::ReviewService;
