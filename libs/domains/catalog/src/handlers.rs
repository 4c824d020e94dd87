use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{AppError, AuthUser, ErrorResponse, IdPath, ValidatedJson};
use serde::Serialize;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{
    Category, CreateCategory, CreateProduct, Product, ProductFilter, ProductPage,
};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::{CategoryService, ProductService};

/// OpenAPI documentation for the Categories API
#[derive(OpenApi)]
#[openapi(
    paths(list_categories, create_category, update_category, delete_category),
    components(schemas(Category, CreateCategory, ErrorResponse)),
    tags(
        (name = "categories", description = "Product category tree")
    )
)]
pub struct CategoriesApiDoc;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        products_by_category,
        get_product,
        update_product,
        delete_product
    ),
    components(schemas(Product, CreateProduct, ProductPage, ErrorResponse)),
    tags(
        (name = "products", description = "Product catalog with search and filters")
    )
)]
pub struct ProductsApiDoc;

/// Create the categories router with all HTTP endpoints
pub fn categories_router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            axum::routing::put(update_category).delete(delete_category),
        )
        .with_state(shared_service)
}

/// Create the products router with all HTTP endpoints
pub fn products_router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/category/{id}", get(products_by_category))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

// Categories

/// List all active categories
#[utoipa::path(
    get,
    path = "",
    tag = "categories",
    responses(
        (status = 200, description = "Active categories", body = Vec<Category>)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> CatalogResult<Json<Vec<Category>>> {
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "",
    tag = "categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Parent missing or inactive", body = ErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CreateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Invalid parent", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn update_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<Json<Category>> {
    let category = service.update_category(id, input).await?;
    Ok(Json(category))
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
struct StatusResponse {
    status: &'static str,
    message: &'static str,
}

/// Soft-delete a category
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category marked inactive"),
        (status = 400, description = "Already inactive", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<StatusResponse>> {
    service.delete_category(id).await?;
    Ok(Json(StatusResponse {
        status: "success",
        message: "Category marked as inactive",
    }))
}

// Products

/// Filtered, searchable, paginated product listing
#[utoipa::path(
    get,
    path = "",
    tag = "products",
    params(ProductFilter),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, description = "Invalid filter parameters", body = ErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> CatalogResult<Json<ProductPage>> {
    let page = service.list_products(filter).await?;
    Ok(Json(page))
}

/// Create a new product for the authenticated seller
#[utoipa::path(
    post,
    path = "",
    tag = "products",
    request_body = CreateProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid category", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Seller role required", body = ErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> Result<impl IntoResponse, AppError> {
    user.require_role("seller")?;
    let product = service.create_product(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Active products of one category
#[utoipa::path(
    get,
    path = "/category/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Products in category", body = Vec<Product>),
        (status = 400, description = "Category missing or inactive", body = ErrorResponse)
    )
)]
async fn products_by_category<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = service.products_by_category(id).await?;
    Ok(Json(products))
}

/// Product detail
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Update one of the authenticated seller's products
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = CreateProduct,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 403, description = "Not the product owner", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> Result<Json<Product>, AppError> {
    user.require_role("seller")?;
    let product = service.update_product(user.id, id, input).await?;
    Ok(Json(product))
}

/// Soft-delete one of the authenticated seller's products
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product marked inactive", body = Product),
        (status = 403, description = "Not the product owner", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Product>, AppError> {
    user.require_role("seller")?;
    let product = service.delete_product(user.id, id).await?;
    Ok(Json(product))
}
