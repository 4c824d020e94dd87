//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Shop API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "E-commerce backend: catalog with full-text search, carts, reviews, JWT auth",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/api/categories", api = domain_catalog::CategoriesApiDoc),
        (path = "/api/products", api = domain_catalog::ProductsApiDoc),
        (path = "/api/products", api = domain_reviews::ProductReviewsApiDoc),
        (path = "/api/reviews", api = domain_reviews::ApiDoc),
        (path = "/api/cart", api = domain_cart::ApiDoc)
    ),
    tags(
        (name = "users", description = "Registration and authentication"),
        (name = "categories", description = "Product category tree"),
        (name = "products", description = "Product catalog"),
        (name = "reviews", description = "Product reviews"),
        (name = "cart", description = "Shopping cart")
    )
)]
pub struct ApiDoc;
