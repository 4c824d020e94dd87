//! Integration tests for the reviews domain
//!
//! The interesting property is transactional rating aggregation: after
//! any review mutation the product's stored rating equals the mean grade
//! of its active reviews. These tests check the round trip against real
//! PostgreSQL.

use domain_reviews::*;
use test_utils::{TestDataBuilder, TestDatabase};

struct Reviews {
    db: TestDatabase,
    repo: PgReviewRepository,
    product_id: i32,
    buyer_id: i32,
}

async fn reviews(test_name: &str) -> Reviews {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name(test_name);

    let seller_id = db.create_test_user(&builder.email("seller"), "seller").await;
    let buyer_id = db.create_test_user(&builder.email("buyer"), "buyer").await;
    let category_id = db.create_test_category(&builder.name("category", "main")).await;
    let product_id = db
        .create_test_product("Copper Kettle", None, "40.00", category_id, seller_id)
        .await;

    let repo = PgReviewRepository::new(db.connection());

    Reviews {
        db,
        repo,
        product_id,
        buyer_id,
    }
}

async fn stored_rating(ctx: &Reviews) -> f64 {
    let repo = domain_catalog::PgProductRepository::new(ctx.db.connection());
    domain_catalog::ProductRepository::get(&repo, ctx.product_id)
        .await
        .unwrap()
        .expect("product must exist")
        .rating
}

fn review(product_id: i32, grade: i32) -> CreateReview {
    CreateReview {
        product_id,
        grade,
        comment: None,
    }
}

#[tokio::test]
async fn test_rating_round_trip() {
    let ctx = reviews("rating_round_trip").await;

    let three = ctx
        .repo
        .create(review(ctx.product_id, 3), ctx.buyer_id)
        .await
        .unwrap();
    ctx.repo
        .create(review(ctx.product_id, 5), ctx.buyer_id)
        .await
        .unwrap();
    assert_eq!(stored_rating(&ctx).await, 4.0);

    ctx.repo.soft_delete(three.id).await.unwrap();
    assert_eq!(stored_rating(&ctx).await, 5.0);
}

#[tokio::test]
async fn test_rating_resets_to_zero() {
    let ctx = reviews("rating_resets").await;

    let only = ctx
        .repo
        .create(review(ctx.product_id, 2), ctx.buyer_id)
        .await
        .unwrap();
    assert_eq!(stored_rating(&ctx).await, 2.0);

    ctx.repo.soft_delete(only.id).await.unwrap();
    assert_eq!(stored_rating(&ctx).await, 0.0);
}

#[tokio::test]
async fn test_edit_updates_rating_and_comment_date() {
    let ctx = reviews("edit_updates").await;

    let created = ctx
        .repo
        .create(review(ctx.product_id, 1), ctx.buyer_id)
        .await
        .unwrap();

    let updated = ctx
        .repo
        .update(
            created.id,
            UpdateReview {
                grade: 5,
                comment: Some("after a month of use".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.grade, 5);
    assert!(updated.comment_date >= created.comment_date);
    assert_eq!(stored_rating(&ctx).await, 5.0);
}

#[tokio::test]
async fn test_soft_deleted_reviews_are_invisible() {
    let ctx = reviews("soft_delete_visibility").await;

    let created = ctx
        .repo
        .create(review(ctx.product_id, 4), ctx.buyer_id)
        .await
        .unwrap();
    ctx.repo.soft_delete(created.id).await.unwrap();

    assert!(ctx.repo.get_active(created.id).await.unwrap().is_none());
    assert!(
        ctx.repo
            .list_active_for_product(ctx.product_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_grade_check_constraint_is_enforced() {
    let ctx = reviews("grade_constraint").await;

    // Bypassing handler validation still cannot store a bad grade
    let result = ctx
        .repo
        .create(review(ctx.product_id, 6), ctx.buyer_id)
        .await;
    assert!(result.is_err());
    assert_eq!(stored_rating(&ctx).await, 0.0);
}
