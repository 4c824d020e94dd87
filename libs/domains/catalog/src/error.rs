use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(i32),

    #[error("Product not found: {0}")]
    ProductNotFound(i32),

    /// Referenced category is missing or inactive (400, not 404: the
    /// category is an input here, not the requested resource)
    #[error("Category {0} not found or inactive")]
    InvalidCategory(i32),

    #[error("min_price cannot exceed max_price")]
    InvalidPriceRange,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("You can only modify your own products")]
    NotOwner,

    #[error("Media store error: {0}")]
    Media(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(id) => {
                AppError::NotFound(format!("Category {} not found", id))
            }
            CatalogError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            CatalogError::InvalidCategory(id) => {
                AppError::BadRequest(format!("Category {} not found or inactive", id))
            }
            CatalogError::InvalidPriceRange => {
                AppError::BadRequest("min_price cannot exceed max_price".to_string())
            }
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::NotOwner => {
                AppError::Forbidden("You can only modify your own products".to_string())
            }
            CatalogError::Media(msg) => AppError::InternalServerError(msg),
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
