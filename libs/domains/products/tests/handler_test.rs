//! Handler tests for the Products API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::{AuthUser, Role};
use domain_products::models::{ProductResponse, ProductsResponse};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, user: Option<AuthUser>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.extension(user);
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn app() -> Router {
    handlers::router(ProductService::new(InMemoryProductRepository::new()))
}

fn employee() -> AuthUser {
    AuthUser::new(Uuid::now_v7(), Role::Employee)
}

fn new_product(category_id: Uuid, price: i64) -> Value {
    json!({
        "name": "Desk Lamp",
        "description": "Warm light for late nights",
        "price": price,
        "stock": 5,
        "idCategory": category_id,
        "imageUrl": "https://cdn.example.com/lamp.png"
    })
}

async fn create(app: &Router, category_id: Uuid, price: i64) -> ProductResponse {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            Some(employee()),
            Some(new_product(category_id, price)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_requires_identity() {
    let response = app()
        .oneshot(request(
            "POST",
            "/",
            None,
            Some(new_product(Uuid::now_v7(), 100)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customer_cannot_create() {
    let customer = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = app()
        .oneshot(request(
            "POST",
            "/",
            Some(customer),
            Some(new_product(Uuid::now_v7(), 100)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_and_fetch_publicly() {
    let app = app();
    let created = create(&app, Uuid::now_v7(), 1500).await;
    assert_eq!(created.message, "Product created successfully");

    let response = app
        .oneshot(request(
            "GET",
            &format!("/{}", created.product.id),
            None,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(body.product.price, 1500);
}

#[tokio::test]
async fn test_invalid_price_returns_400() {
    let response = app()
        .oneshot(request(
            "POST",
            "/",
            Some(employee()),
            Some(new_product(Uuid::now_v7(), -5)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filters_by_category_and_price() {
    let app = app();
    let lamps = Uuid::now_v7();
    create(&app, lamps, 1000).await;
    create(&app, lamps, 3000).await;
    create(&app, Uuid::now_v7(), 1000).await;

    let response = app
        .oneshot(request(
            "GET",
            &format!("/?category_id={}&max_price=2000", lamps),
            None,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ProductsResponse = json_body(response.into_body()).await;
    assert_eq!(body.total, 1);
    assert_eq!(body.products[0].price, 1000);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = app();
    let created = create(&app, Uuid::now_v7(), 1500).await;
    let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);
    let uri = format!("/{}", created.product.id);

    let response = app
        .clone()
        .oneshot(request("PUT", &uri, Some(admin), Some(json!({ "stock": 0 }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(body.product.stock, 0);

    let response = app
        .clone()
        .oneshot(request("DELETE", &uri, Some(admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", &uri, None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_uuid_returns_400() {
    let response = app()
        .oneshot(request("GET", "/not-a-uuid", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
