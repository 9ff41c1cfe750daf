//! Handler tests for the Cart API
//!
//! The router is driven directly with `oneshot`; the authenticated user is
//! injected into the request extensions the way the auth middleware does.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{AuthUser, Role};
use domain_carts::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, user: AuthUser, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .extension(user)
        .header("content-type", "application/json");

    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn lines(subtotals: &[i64]) -> Value {
    Value::Array(
        subtotals
            .iter()
            .map(|s| json!({ "product_id": Uuid::now_v7(), "quantity": 1, "subtotal": s }))
            .collect(),
    )
}

#[tokio::test]
async fn test_create_cart_returns_201_with_total() {
    let app = handlers::router(CartService::new(InMemoryCartRepository::new()));
    let user = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = app
        .oneshot(request(
            "POST",
            "/",
            user,
            Some(json!({ "line_items": lines(&[10, 25]) })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: CartResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Cart created");
    assert_eq!(body.cart.total, 35);
    assert_eq!(body.cart.owner_id, user.id);
    assert_eq!(body.cart.status, CartStatus::Pending);
}

#[tokio::test]
async fn test_second_pending_cart_returns_409() {
    let service = CartService::new(InMemoryCartRepository::new());
    let user = AuthUser::new(Uuid::now_v7(), Role::Customer);
    service.create_cart(user.id, vec![]).await.unwrap();

    let app = handlers::router(service);
    let response = app
        .oneshot(request(
            "POST",
            "/",
            user,
            Some(json!({ "line_items": lines(&[5]) })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_zero_quantity_returns_400() {
    let app = handlers::router(CartService::new(InMemoryCartRepository::new()));
    let user = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = app
        .oneshot(request(
            "POST",
            "/",
            user,
            Some(json!({
                "line_items": [{ "product_id": Uuid::now_v7(), "quantity": 0, "subtotal": 5 }]
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overflowing_total_returns_400() {
    let app = handlers::router(CartService::new(InMemoryCartRepository::new()));
    let user = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = app
        .oneshot(request(
            "POST",
            "/",
            user,
            Some(json!({ "line_items": lines(&[i64::MAX, 1]) })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_customer_cannot_touch_another_users_cart() {
    let service = CartService::new(InMemoryCartRepository::new());
    let owner = Uuid::now_v7();
    service.create_cart(owner, vec![]).await.unwrap();

    let app = handlers::router(service);
    let intruder = AuthUser::new(Uuid::now_v7(), Role::Customer);
    let response = app
        .oneshot(request("GET", &format!("/{}", owner), intruder, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_can_read_any_cart() {
    let service = CartService::new(InMemoryCartRepository::new());
    let owner = Uuid::now_v7();
    service.create_cart(owner, vec![]).await.unwrap();

    let app = handlers::router(service);
    let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);
    let response = app
        .oneshot(request("GET", &format!("/{}", owner), admin, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_replace_line_items_updates_total() {
    let service = CartService::new(InMemoryCartRepository::new());
    let user = AuthUser::new(Uuid::now_v7(), Role::Customer);
    service.create_cart(user.id, vec![]).await.unwrap();

    let app = handlers::router(service);
    let response = app
        .oneshot(request(
            "PUT",
            &format!("/{}", user.id),
            user,
            Some(json!({ "line_items": lines(&[3, 4, 5]) })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: CartResponse = json_body(response.into_body()).await;
    assert_eq!(body.cart.total, 12);
    assert_eq!(body.cart.line_items.len(), 3);
}

#[tokio::test]
async fn test_confirm_without_pending_cart_returns_404() {
    let app = handlers::router(CartService::new(InMemoryCartRepository::new()));
    let user = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = app
        .oneshot(request("PUT", &format!("/{}/confirm", user.id), user, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_then_list_shows_cancelled_cart() {
    let service = CartService::new(InMemoryCartRepository::new());
    let user = AuthUser::new(Uuid::now_v7(), Role::Customer);
    service.create_cart(user.id, vec![]).await.unwrap();

    let app = handlers::router(service);
    let response = app
        .clone()
        .oneshot(request("PUT", &format!("/{}/cancel", user.id), user, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", &format!("/user/{}", user.id), user, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: CartsResponse = json_body(response.into_body()).await;
    assert_eq!(body.carts.len(), 1);
    assert_eq!(body.carts[0].status, CartStatus::Cancelled);
}

#[tokio::test]
async fn test_delete_cart() {
    let service = CartService::new(InMemoryCartRepository::new());
    let user = AuthUser::new(Uuid::now_v7(), Role::Customer);
    service.create_cart(user.id, vec![]).await.unwrap();

    let app = handlers::router(service);
    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/{}", user.id), user, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", &format!("/{}", user.id), user, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_uuid_returns_400() {
    let app = handlers::router(CartService::new(InMemoryCartRepository::new()));
    let user = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = app
        .oneshot(request("GET", "/not-a-uuid", user, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_identity_returns_401() {
    let app = handlers::router(CartService::new(InMemoryCartRepository::new()));

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", Uuid::now_v7()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
