//! Handler tests for the Reviews API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use axum_helpers::{AuthUser, Role};
use domain_reviews::*;
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
    handlers::router(ReviewService::new(InMemoryReviewRepository::new()))
}

async fn post_review(app: &Router, author: AuthUser, product_id: Uuid) -> ReviewResponse {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            Some(author),
            Some(json!({ "productId": product_id, "rating": 4, "comment": "Nice" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_posting_requires_identity() {
    let response = app()
        .oneshot(request(
            "POST",
            "/",
            None,
            Some(json!({ "productId": Uuid::now_v7(), "rating": 4, "comment": "Nice" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rating_above_five_returns_400() {
    let author = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = app()
        .oneshot(request(
            "POST",
            "/",
            Some(author),
            Some(json!({ "productId": Uuid::now_v7(), "rating": 6, "comment": "Nice" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_by_product_is_public() {
    let app = app();
    let author = AuthUser::new(Uuid::now_v7(), Role::Customer);
    let product = Uuid::now_v7();
    let posted = post_review(&app, author, product).await;
    assert_eq!(posted.review.user_id, author.id);
    post_review(&app, author, Uuid::now_v7()).await;

    let response = app
        .oneshot(request(
            "GET",
            &format!("/?product_id={}", product),
            None,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: ReviewsResponse = json_body(response.into_body()).await;
    assert_eq!(body.reviews.len(), 1);
    assert_eq!(body.reviews[0].id, posted.review.id);
}

#[tokio::test]
async fn test_stranger_cannot_edit_or_delete() {
    let app = app();
    let author = AuthUser::new(Uuid::now_v7(), Role::Customer);
    let posted = post_review(&app, author, Uuid::now_v7()).await;
    let uri = format!("/{}", posted.review.id);
    let stranger = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = app
        .clone()
        .oneshot(request("PUT", &uri, Some(stranger), Some(json!({ "rating": 1 }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request("DELETE", &uri, Some(stranger), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(request("PUT", &uri, Some(author), Some(json!({ "comments": "Changed my mind" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: ReviewResponse = json_body(response.into_body()).await;
    assert_eq!(body.review.comment, "Changed my mind");
}

#[tokio::test]
async fn test_admin_deletes_any_review() {
    let app = app();
    let author = AuthUser::new(Uuid::now_v7(), Role::Customer);
    let posted = post_review(&app, author, Uuid::now_v7()).await;
    let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/{}", posted.review.id),
            Some(admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request("GET", &format!("/{}", posted.review.id), None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
