use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_helpers::{ErrorResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{LoginRequest, RefreshRequest, RegisterRequest, TokenResponse, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(register, login, refresh_token),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        RefreshRequest,
        TokenResponse,
        UserResponse,
        ErrorResponse
    )),
    tags(
        (name = "users", description = "User registration and authentication")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(register))
        .route("/token", post(login))
        .route("/refresh-token", post(refresh_token))
        .with_state(shared_service)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/token",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<TokenResponse>> {
    let tokens = service.login(&input.email, &input.password).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a fresh access token
#[utoipa::path(
    post,
    path = "/refresh-token",
    tag = "users",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    )
)]
async fn refresh_token<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Json(input): Json<RefreshRequest>,
) -> UserResult<Json<TokenResponse>> {
    let tokens = service.refresh(&input.refresh_token).await?;
    Ok(Json(tokens))
}
