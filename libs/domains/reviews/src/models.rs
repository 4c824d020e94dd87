use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A buyer's review of a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub comment: Option<String>,
    /// Grade from 1 (worst) to 5 (best)
    pub grade: i32,
    pub comment_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Request payload for creating a review
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub product_id: i32,

    #[validate(range(min = 1, max = 5, message = "Grade must be between 1 and 5"))]
    pub grade: i32,

    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

/// Request payload for editing a review. The edit refreshes the comment
/// date; the active flag is not touchable through edits.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5, message = "Grade must be between 1 and 5"))]
    pub grade: i32,

    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}
