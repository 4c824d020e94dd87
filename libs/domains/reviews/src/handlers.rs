use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{AppError, AuthUser, ErrorResponse, IdPath, ValidatedJson};
use serde::Serialize;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ReviewResult;
use crate::models::{CreateReview, Review, UpdateReview};
use crate::repository::ReviewRepository;
use crate::service::ReviewService;

/// OpenAPI documentation for the Reviews API
#[derive(OpenApi)]
#[openapi(
    paths(list_reviews, create_review, update_review, delete_review),
    components(schemas(Review, CreateReview, UpdateReview, ErrorResponse)),
    tags(
        (name = "reviews", description = "Product reviews and rating aggregation")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the per-product reviews listing, nested
/// under the products prefix by the app
#[derive(OpenApi)]
#[openapi(
    paths(product_reviews),
    components(schemas(Review, ErrorResponse))
)]
pub struct ProductReviewsApiDoc;

/// Create the reviews router with all HTTP endpoints
pub fn reviews_router<R: ReviewRepository + 'static>(service: ReviewService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            axum::routing::put(update_review).delete(delete_review),
        )
        .with_state(shared_service)
}

/// Reviews of one product; nested under the products prefix by the app
pub fn product_reviews_router<R: ReviewRepository + 'static>(
    service: ReviewService<R>,
) -> Router {
    Router::new()
        .route("/{id}/reviews", get(product_reviews))
        .with_state(Arc::new(service))
}

/// All active reviews of active products
#[utoipa::path(
    get,
    path = "",
    tag = "reviews",
    responses(
        (status = 200, description = "Active reviews", body = Vec<Review>)
    )
)]
async fn list_reviews<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
) -> ReviewResult<Json<Vec<Review>>> {
    let reviews = service.list_reviews().await?;
    Ok(Json(reviews))
}

/// Active reviews of one product
#[utoipa::path(
    get,
    path = "/{id}/reviews",
    tag = "reviews",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Reviews for the product", body = Vec<Review>),
        (status = 404, description = "Product missing or inactive", body = ErrorResponse)
    )
)]
async fn product_reviews<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    IdPath(id): IdPath,
) -> ReviewResult<Json<Vec<Review>>> {
    let reviews = service.product_reviews(id).await?;
    Ok(Json(reviews))
}

/// Create a review as the authenticated buyer
#[utoipa::path(
    post,
    path = "",
    tag = "reviews",
    request_body = CreateReview,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Buyer role required", body = ErrorResponse),
        (status = 404, description = "Product missing or inactive", body = ErrorResponse)
    )
)]
async fn create_review<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateReview>,
) -> Result<impl IntoResponse, AppError> {
    user.require_role("buyer")?;
    let review = service.create_review(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Update one of the authenticated buyer's reviews
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review ID")),
    request_body = UpdateReview,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 403, description = "Not the review author", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
async fn update_review<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateReview>,
) -> Result<Json<Review>, AppError> {
    user.require_role("buyer")?;
    let review = service.update_review(user.id, id, input).await?;
    Ok(Json(review))
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
struct MessageResponse {
    message: &'static str,
}

/// Soft-delete a review (admin only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review marked inactive"),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
async fn delete_review<R: ReviewRepository>(
    State(service): State<Arc<ReviewService<R>>>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    user.require_role("admin")?;
    service.delete_review(id).await?;
    Ok(Json(MessageResponse {
        message: "Review deleted",
    }))
}
