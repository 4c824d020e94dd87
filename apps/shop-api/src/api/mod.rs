//! API routes module

use axum::{Router, middleware};
use axum_helpers::optional_jwt_auth_middleware;
use domain_cart::{CartService, PgCartRepository};
use domain_catalog::{
    CategoryService, LocalMediaStore, MediaStore, PgCategoryRepository, PgProductRepository,
    ProductService,
};
use domain_reviews::{PgReviewRepository, ReviewService};
use domain_users::{PgUserRepository, UserService};
use std::sync::Arc;

use crate::state::AppState;

/// Create all API routes backed by PostgreSQL repositories.
///
/// The JWT middleware is optional at this layer: it decodes a bearer
/// token into request extensions when present, and each handler decides
/// whether a principal is required.
pub fn routes(state: &AppState) -> Router {
    let db = state.db.clone();
    let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(
        &state.config.media_root,
        &state.config.media_base_url,
    ));

    let user_service = UserService::new(PgUserRepository::new(db.clone()), state.jwt.clone());
    let category_service = CategoryService::new(PgCategoryRepository::new(db.clone()));
    let product_service = ProductService::new(PgProductRepository::new(db.clone()), media);
    let review_service = ReviewService::new(PgReviewRepository::new(db.clone()));
    let cart_service = CartService::new(PgCartRepository::new(db));

    Router::new()
        .nest("/users", domain_users::handlers::router(user_service))
        .nest(
            "/categories",
            domain_catalog::handlers::categories_router(category_service),
        )
        .nest(
            "/products",
            domain_catalog::handlers::products_router(product_service).merge(
                domain_reviews::handlers::product_reviews_router(review_service.clone()),
            ),
        )
        .nest(
            "/reviews",
            domain_reviews::handlers::reviews_router(review_service),
        )
        .nest("/cart", domain_cart::handlers::cart_router(cart_service))
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            optional_jwt_auth_middleware,
        ))
}
