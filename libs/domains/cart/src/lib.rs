//! Cart Domain
//!
//! Per-user shopping cart with one line per (user, product). Adding an
//! already-carted product merges quantities atomically; in PostgreSQL the
//! merge is a single `INSERT ... ON CONFLICT DO UPDATE`, so concurrent
//! adds can never produce duplicate lines.
//!
//! Totals are computed at read time from the joined product prices; the
//! cart stores no derived state.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CartError, CartResult};
pub use handlers::ApiDoc;
pub use models::{AddToCart, Cart, CartLine, SetQuantity};
pub use postgres::PgCartRepository;
pub use repository::{CartRepository, InMemoryCart};
pub use service::CartService;
