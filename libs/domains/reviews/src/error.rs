use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(i32),

    /// The reviewed product is missing or inactive. The product is the
    /// requested resource here, so this maps to 404.
    #[error("Product not found: {0}")]
    ProductNotFound(i32),

    #[error("You can only update your own reviews")]
    NotAuthor,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ReviewResult<T> = Result<T, ReviewError>;

/// Convert ReviewError to AppError for standardized error responses
impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(id) => AppError::NotFound(format!("Review {} not found", id)),
            ReviewError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            ReviewError::NotAuthor => {
                AppError::Forbidden("You can only update your own reviews".to_string())
            }
            ReviewError::Validation(msg) => AppError::BadRequest(msg),
            ReviewError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
