//! Handler tests for the Categories API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::{AuthUser, Role};
use domain_categories::*;
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
    handlers::router(CategoryService::new(InMemoryCategoryRepository::new()))
}

fn admin() -> AuthUser {
    AuthUser::new(Uuid::now_v7(), Role::Admin)
}

async fn create(app: &Router, name: &str) -> axum::response::Response {
    app.clone()
        .oneshot(request("POST", "/", Some(admin()), Some(json!({ "name": name }))))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_and_list() {
    let app = app();

    let response = create(&app, " Lighting ").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: CategoryResponse = json_body(response.into_body()).await;
    assert_eq!(body.category.name, "Lighting");

    let response = app
        .oneshot(request("GET", "/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: CategoriesResponse = json_body(response.into_body()).await;
    assert_eq!(body.categories.len(), 1);
}

#[tokio::test]
async fn test_missing_name_returns_400() {
    let response = app()
        .oneshot(request("POST", "/", Some(admin()), Some(json!({}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_name_returns_409() {
    let app = app();
    create(&app, "Books").await;

    let response = create(&app, "Books").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_customer_cannot_create() {
    let customer = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = app()
        .oneshot(request("POST", "/", Some(customer), Some(json!({ "name": "Toys" }))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rename_and_delete() {
    let app = app();
    let created: CategoryResponse = json_body(create(&app, "Toys").await.into_body()).await;
    let uri = format!("/{}", created.category.id);

    let response = app
        .clone()
        .oneshot(request("PUT", &uri, Some(admin()), Some(json!({ "name": "Games" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: CategoryResponse = json_body(response.into_body()).await;
    assert_eq!(body.category.name, "Games");

    let response = app
        .clone()
        .oneshot(request("DELETE", &uri, Some(admin()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("DELETE", &uri, Some(admin()), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
