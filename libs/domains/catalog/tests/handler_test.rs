//! Handler tests for the catalog domain
//!
//! Verify JSON shapes and status codes on the listing endpoint, routed
//! through the real axum router against a containerized database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_catalog::*;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn media() -> Arc<dyn MediaStore> {
    let root = std::env::temp_dir().join(format!("catalog-handler-{}", std::process::id()));
    Arc::new(LocalMediaStore::new(root, "/media"))
}

#[tokio::test]
async fn test_list_products_returns_page_envelope() {
    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("handler_page_envelope");

    let seller_id = db.create_test_user(&builder.email("seller"), "seller").await;
    let category_id = db.create_test_category(&builder.name("category", "main")).await;
    db.create_test_product("Copper Kettle", None, "40.00", category_id, seller_id)
        .await;

    let service = ProductService::new(PgProductRepository::new(db.connection()), media());
    let app = handlers::products_router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/?page=1&page_size=10")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page: ProductPage = json_body(response.into_body()).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 10);
    assert!(page.ranks.is_none());
    assert_eq!(page.items[0].price, Decimal::new(4000, 2));
}

#[tokio::test]
async fn test_inverted_price_range_is_bad_request() {
    let db = TestDatabase::new().await;

    let service = ProductService::new(PgProductRepository::new(db.connection()), media());
    let app = handlers::products_router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/?min_price=100&max_price=50")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_out_of_range_page_size_is_bad_request() {
    let db = TestDatabase::new().await;

    let service = ProductService::new(PgProductRepository::new(db.connection()), media());
    let app = handlers::products_router(service);

    let request = Request::builder()
        .method("GET")
        .uri("/?page_size=101")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unauthenticated_product_create_is_rejected() {
    let db = TestDatabase::new().await;

    let service = ProductService::new(PgProductRepository::new(db.connection()), media());
    let app = handlers::products_router(service);

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"name":"Widget","price":9.99,"stock":1,"category_id":1}"#,
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
