//! Handler tests for the Users and Auth APIs

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{AuthUser, JwtAuth, JwtConfig, Role};
use domain_users::models::{AddressEnvelope, AddressesEnvelope, MessageResponse, UserEnvelope};
use domain_users::*;
use email::{MockSmtpProvider, TemplateEngine};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
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

struct Fixture {
    auth: Router,
    users: Router,
    service: UserService<InMemoryUserRepository>,
    mailer: MockSmtpProvider,
}

fn fixture() -> Fixture {
    let service = UserService::new(InMemoryUserRepository::new());
    let mailer = MockSmtpProvider::new();
    let reset = PasswordResetService::new(
        service.clone(),
        Arc::new(InMemoryCodeStore::new()),
        Arc::new(mailer.clone()),
        TemplateEngine::new().unwrap(),
    );
    let jwt_config = JwtConfig::new("test-secret-key-that-is-long-enough-for-hs256").unwrap();

    let state = AuthState {
        service: service.clone(),
        reset,
        jwt_auth: JwtAuth::new(&jwt_config),
        secure_cookies: false,
    };

    Fixture {
        auth: auth_handlers::router(state),
        users: handlers::router(service.clone()),
        service,
        mailer,
    }
}

fn registration(email: &str) -> Value {
    json!({
        "name": "Ana",
        "email": email,
        "password": "Secret123",
        "phone": "555-0100"
    })
}

async fn register(fx: &Fixture, email: &str) -> AuthResponse {
    let response = fx
        .auth
        .clone()
        .oneshot(request("POST", "/register", None, Some(registration(email))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_register_sets_cookie_and_returns_token() {
    let fx = fixture();

    let response = fx
        .auth
        .clone()
        .oneshot(request(
            "POST",
            "/register",
            None,
            Some(registration("ana@example.com")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("authToken="));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Secure"));

    let body: AuthResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "User registered successfully");
    assert!(!body.token.is_empty());
    assert_eq!(body.user.role, Role::Customer);
}

#[tokio::test]
async fn test_register_duplicate_email_returns_409() {
    let fx = fixture();
    register(&fx, "ana@example.com").await;

    let response = fx
        .auth
        .clone()
        .oneshot(request(
            "POST",
            "/register",
            None,
            Some(registration("ANA@example.com")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login() {
    let fx = fixture();
    let registered = register(&fx, "ana@example.com").await;

    let response = fx
        .auth
        .clone()
        .oneshot(request(
            "POST",
            "/login",
            None,
            Some(json!({ "email": "ana@example.com", "password": "Wrong1234" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = fx
        .auth
        .clone()
        .oneshot(request(
            "POST",
            "/login",
            None,
            Some(json!({ "email": "ana@example.com", "password": "Secret123" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: AuthResponse = json_body(response.into_body()).await;
    assert_eq!(body.user.id, registered.user.id);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let fx = fixture();

    let response = fx
        .auth
        .clone()
        .oneshot(request("POST", "/logout", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_password_reset_request_does_not_enumerate() {
    let fx = fixture();
    register(&fx, "ana@example.com").await;

    let mut messages = Vec::new();
    for email in ["ana@example.com", "ghost@example.com"] {
        let response = fx
            .auth
            .clone()
            .oneshot(request(
                "POST",
                "/password-reset/request",
                None,
                Some(json!({ "email": email })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = json_body(response.into_body()).await;
        messages.push(body.message);
    }

    assert_eq!(messages[0], messages[1]);
    assert_eq!(fx.mailer.sent_count().await, 1);
}

#[tokio::test]
async fn test_password_reset_verify_with_wrong_code_returns_400() {
    let fx = fixture();
    register(&fx, "ana@example.com").await;

    let response = fx
        .auth
        .clone()
        .oneshot(request(
            "POST",
            "/password-reset/verify",
            None,
            Some(json!({ "email": "ana@example.com", "code": "123456" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_requires_identity() {
    let fx = fixture();

    let response = fx
        .users
        .clone()
        .oneshot(request("GET", "/me", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_caller() {
    let fx = fixture();
    let registered = register(&fx, "ana@example.com").await;
    let caller = AuthUser::new(registered.user.id, Role::Customer);

    let response = fx
        .users
        .clone()
        .oneshot(request("GET", "/me", Some(caller), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: UserEnvelope = json_body(response.into_body()).await;
    assert_eq!(body.user.email, "ana@example.com");
}

#[tokio::test]
async fn test_listing_users_is_admin_only() {
    let fx = fixture();
    let registered = register(&fx, "ana@example.com").await;

    let customer = AuthUser::new(registered.user.id, Role::Customer);
    let response = fx
        .users
        .clone()
        .oneshot(request("GET", "/", Some(customer), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);
    let response = fx
        .users
        .clone()
        .oneshot(request("GET", "/?role=Cliente", Some(admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_customer_cannot_promote_self() {
    let fx = fixture();
    let registered = register(&fx, "ana@example.com").await;
    let caller = AuthUser::new(registered.user.id, Role::Customer);

    let response = fx
        .users
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/{}", registered.user.id),
            Some(caller),
            Some(json!({ "role": "Administrador" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_address_book_over_http() {
    let fx = fixture();
    let registered = register(&fx, "ana@example.com").await;
    let caller = AuthUser::new(registered.user.id, Role::Customer);

    let response = fx
        .users
        .clone()
        .oneshot(request(
            "POST",
            "/addresses",
            Some(caller),
            Some(json!({ "title": "Home", "address": "Main St 1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let home: AddressEnvelope = json_body(response.into_body()).await;
    assert!(home.address.is_default);

    let response = fx
        .users
        .clone()
        .oneshot(request(
            "POST",
            "/addresses",
            Some(caller),
            Some(json!({ "title": "Office", "address": "Market St 9", "isDefault": true })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let office: AddressEnvelope = json_body(response.into_body()).await;

    let response = fx
        .users
        .clone()
        .oneshot(request("GET", "/addresses", Some(caller), None))
        .await
        .unwrap();
    let book: AddressesEnvelope = json_body(response.into_body()).await;
    assert_eq!(book.addresses.len(), 2);
    assert!(!book.addresses[0].is_default);
    assert!(book.addresses[1].is_default);

    let response = fx
        .users
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/addresses/{}", office.address.id),
            Some(caller),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = fx
        .users
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/addresses/{}", home.address.id),
            Some(caller),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let addresses = fx.service.list_addresses(registered.user.id).await.unwrap();
    assert_eq!(addresses.len(), 1);
    assert!(addresses[0].is_default);
}

#[tokio::test]
async fn test_blank_address_title_returns_400() {
    let fx = fixture();
    let registered = register(&fx, "ana@example.com").await;
    let caller = AuthUser::new(registered.user.id, Role::Customer);

    let response = fx
        .users
        .clone()
        .oneshot(request(
            "POST",
            "/addresses",
            Some(caller),
            Some(json!({ "title": "   ", "address": "Main St 1" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_users_address_book_is_forbidden() {
    let fx = fixture();
    let registered = register(&fx, "ana@example.com").await;
    let stranger = AuthUser::new(Uuid::now_v7(), Role::Customer);

    let response = fx
        .users
        .clone()
        .oneshot(request(
            "GET",
            &format!("/{}/addresses", registered.user.id),
            Some(stranger),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);
    let response = fx
        .users
        .clone()
        .oneshot(request(
            "POST",
            &format!("/{}/addresses", registered.user.id),
            Some(admin),
            Some(json!({ "title": "Home", "address": "Main St 1" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}
