use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Cart item not found")]
    ItemNotFound,

    #[error("Product not found: {0}")]
    ProductNotFound(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CartResult<T> = Result<T, CartError>;

/// Convert CartError to AppError for standardized error responses
impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ItemNotFound => AppError::NotFound("Cart item not found".to_string()),
            CartError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            CartError::Validation(msg) => AppError::BadRequest(msg),
            CartError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
