use std::sync::Arc;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{CreateReview, Review, UpdateReview};
use crate::repository::ReviewRepository;

/// Service layer for review business logic
#[derive(Clone)]
pub struct ReviewService<R: ReviewRepository> {
    repository: Arc<R>,
}

impl<R: ReviewRepository> ReviewService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_reviews(&self) -> ReviewResult<Vec<Review>> {
        self.repository.list_active().await
    }

    pub async fn product_reviews(&self, product_id: i32) -> ReviewResult<Vec<Review>> {
        self.require_active_product(product_id).await?;
        self.repository.list_active_for_product(product_id).await
    }

    pub async fn create_review(&self, user_id: i32, input: CreateReview) -> ReviewResult<Review> {
        self.require_active_product(input.product_id).await?;
        self.repository.create(input, user_id).await
    }

    /// Author-only edit. The repository refreshes the comment date and
    /// recomputes the product rating.
    pub async fn update_review(
        &self,
        user_id: i32,
        id: i32,
        input: UpdateReview,
    ) -> ReviewResult<Review> {
        let review = self
            .repository
            .get_active(id)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        if review.user_id != user_id {
            return Err(ReviewError::NotAuthor);
        }

        self.repository.update(id, input).await
    }

    /// Soft delete. The admin gate lives at the handler.
    pub async fn delete_review(&self, id: i32) -> ReviewResult<()> {
        self.repository
            .get_active(id)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        self.repository.soft_delete(id).await
    }

    async fn require_active_product(&self, product_id: i32) -> ReviewResult<()> {
        if !self.repository.active_product_exists(product_id).await? {
            return Err(ReviewError::ProductNotFound(product_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryReviewStore, MockReviewRepository};
    use mockall::predicate::eq;

    fn review(product_id: i32, grade: i32) -> CreateReview {
        CreateReview {
            product_id,
            grade,
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_create_for_missing_product_is_not_found() {
        let mut repo = MockReviewRepository::new();
        repo.expect_active_product_exists()
            .with(eq(99))
            .returning(|_| Ok(false));
        repo.expect_create().never();

        let service = ReviewService::new(repo);
        let result = service.create_review(1, review(99, 5)).await;
        assert!(matches!(result, Err(ReviewError::ProductNotFound(99))));
    }

    #[tokio::test]
    async fn test_update_foreign_review_is_forbidden() {
        let store = InMemoryReviewStore::new();
        store.seed_product(7).await;
        let created = store.create(review(7, 4), 1).await.unwrap();

        let service = ReviewService::new(store);
        let result = service
            .update_review(
                2,
                created.id,
                UpdateReview {
                    grade: 1,
                    comment: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ReviewError::NotAuthor)));
    }

    #[tokio::test]
    async fn test_author_can_edit_own_review() {
        let store = InMemoryReviewStore::new();
        store.seed_product(7).await;
        let created = store.create(review(7, 4), 1).await.unwrap();

        let service = ReviewService::new(store);
        let updated = service
            .update_review(
                1,
                created.id,
                UpdateReview {
                    grade: 2,
                    comment: Some("changed my mind".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.grade, 2);
    }

    #[tokio::test]
    async fn test_delete_missing_review_is_not_found() {
        let mut repo = MockReviewRepository::new();
        repo.expect_get_active().with(eq(5)).returning(|_| Ok(None));
        repo.expect_soft_delete().never();

        let service = ReviewService::new(repo);
        let result = service.delete_review(5).await;
        assert!(matches!(result, Err(ReviewError::NotFound(5))));
    }

    #[tokio::test]
    async fn test_deleted_review_cannot_be_edited() {
        let store = InMemoryReviewStore::new();
        store.seed_product(7).await;
        let created = store.create(review(7, 4), 1).await.unwrap();
        store.soft_delete(created.id).await.unwrap();

        let service = ReviewService::new(store);
        let result = service
            .update_review(
                1,
                created.id,
                UpdateReview {
                    grade: 5,
                    comment: None,
                },
            )
            .await;
        assert!(matches!(result, Err(ReviewError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_product_reviews_rejects_inactive_product() {
        let store = InMemoryReviewStore::new();
        store.seed_product(7).await;
        store.create(review(7, 5), 1).await.unwrap();
        store.deactivate_product(7).await;

        let service = ReviewService::new(store);
        let result = service.product_reviews(7).await;
        assert!(matches!(result, Err(ReviewError::ProductNotFound(7))));
    }
}
