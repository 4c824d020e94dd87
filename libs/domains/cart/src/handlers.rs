use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{AppError, AuthUser, ErrorResponse, IdPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{AddToCart, Cart, CartLine, SetQuantity};
use crate::repository::CartRepository;
use crate::service::CartService;

/// OpenAPI documentation for the Cart API
#[derive(OpenApi)]
#[openapi(
    paths(get_cart, add_item, set_quantity, remove_item, clear_cart),
    components(schemas(Cart, CartLine, AddToCart, SetQuantity, ErrorResponse)),
    tags(
        (name = "cart", description = "Per-user shopping cart")
    )
)]
pub struct ApiDoc;

/// Create the cart router with all HTTP endpoints
pub fn cart_router<R: CartRepository + 'static>(service: CartService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", axum::routing::post(add_item))
        .route(
            "/items/{product_id}",
            axum::routing::put(set_quantity).delete(remove_item),
        )
        .with_state(shared_service)
}

/// The authenticated user's cart with read-time totals
#[utoipa::path(
    get,
    path = "",
    tag = "cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Cart contents", body = Cart),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
async fn get_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
) -> Result<Json<Cart>, AppError> {
    let cart = service.get_cart(user.id).await?;
    Ok(Json(cart))
}

/// Add a product, merging into an existing line
#[utoipa::path(
    post,
    path = "/items",
    tag = "cart",
    request_body = AddToCart,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Merged cart line", body = CartLine),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Product missing or inactive", body = ErrorResponse)
    )
)]
async fn add_item<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<AddToCart>,
) -> Result<impl IntoResponse, AppError> {
    let line = service.add_item(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(line)))
}

/// Replace the quantity of one line
#[utoipa::path(
    put,
    path = "/items/{product_id}",
    tag = "cart",
    params(("product_id" = i32, Path, description = "Product ID")),
    request_body = SetQuantity,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated cart line", body = CartLine),
        (status = 404, description = "Line or product not found", body = ErrorResponse)
    )
)]
async fn set_quantity<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    IdPath(product_id): IdPath,
    ValidatedJson(input): ValidatedJson<SetQuantity>,
) -> Result<Json<CartLine>, AppError> {
    let line = service.set_quantity(user.id, product_id, input).await?;
    Ok(Json(line))
}

/// Remove one line
#[utoipa::path(
    delete,
    path = "/items/{product_id}",
    tag = "cart",
    params(("product_id" = i32, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Line removed"),
        (status = 404, description = "Line not found", body = ErrorResponse)
    )
)]
async fn remove_item<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    IdPath(product_id): IdPath,
) -> Result<StatusCode, AppError> {
    service.remove_item(user.id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Empty the cart. Idempotent.
#[utoipa::path(
    delete,
    path = "",
    tag = "cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Cart cleared"),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
async fn clear_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    service.clear(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
