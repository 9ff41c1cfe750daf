//! HTTP handlers for the Cart API

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    AppError, AuthUser, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    Cart, CartResponse, CartStatus, CartsResponse, CreateCart, LineItem, MessageResponse,
    UpdateCart,
};
use crate::repository::CartRepository;
use crate::service::CartService;

/// OpenAPI documentation for the Cart API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_cart,
        get_pending_cart,
        list_user_carts,
        replace_line_items,
        delete_cart,
        confirm_cart,
        cancel_cart,
    ),
    components(
        schemas(
            Cart, CartStatus, LineItem, CreateCart, UpdateCart,
            CartResponse, CartsResponse, MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Cart", description = "Shopping cart endpoints")
    )
)]
pub struct ApiDoc;

/// Create the cart router. Expects [`AuthUser`] in the request extensions.
pub fn router<R: CartRepository + 'static>(service: CartService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(create_cart))
        .route("/user/{user_id}", get(list_user_carts))
        .route(
            "/{user_id}",
            get(get_pending_cart)
                .put(replace_line_items)
                .delete(delete_cart),
        )
        .route("/{user_id}/confirm", put(confirm_cart))
        .route("/{user_id}/cancel", put(cancel_cart))
        .with_state(shared_service)
}

/// Open a pending cart
#[utoipa::path(
    post,
    path = "",
    tag = "Cart",
    request_body = CreateCart,
    responses(
        (status = 201, description = "Cart created", body = CartResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateCart>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = input.user_id.unwrap_or(user.id);
    user.ensure_can_access(owner_id)?;

    let cart = service.create_cart(owner_id, input.line_items).await?;
    Ok((
        StatusCode::CREATED,
        Json(CartResponse::new("Cart created", cart)),
    ))
}

/// Get the user's pending cart
#[utoipa::path(
    get,
    path = "/{user_id}",
    tag = "Cart",
    params(
        ("user_id" = Uuid, Path, description = "Cart owner")
    ),
    responses(
        (status = 200, description = "Pending cart", body = CartResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_pending_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    UuidPath(owner_id): UuidPath,
) -> Result<Json<CartResponse>, AppError> {
    user.ensure_can_access(owner_id)?;

    let cart = service.get_pending_cart(owner_id).await?;
    Ok(Json(CartResponse::new("Cart retrieved", cart)))
}

/// List every cart of a user, newest first
#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "Cart",
    params(
        ("user_id" = Uuid, Path, description = "Cart owner")
    ),
    responses(
        (status = 200, description = "Carts of the user", body = CartsResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_user_carts<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    UuidPath(owner_id): UuidPath,
) -> Result<Json<CartsResponse>, AppError> {
    user.ensure_can_access(owner_id)?;

    let carts = service.list_carts(owner_id).await?;
    Ok(Json(CartsResponse {
        message: "Carts retrieved".to_string(),
        carts,
    }))
}

/// Replace the lines of the user's pending cart
#[utoipa::path(
    put,
    path = "/{user_id}",
    tag = "Cart",
    params(
        ("user_id" = Uuid, Path, description = "Cart owner")
    ),
    request_body = UpdateCart,
    responses(
        (status = 200, description = "Cart updated", body = CartResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn replace_line_items<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    UuidPath(owner_id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCart>,
) -> Result<Json<CartResponse>, AppError> {
    user.ensure_can_access(owner_id)?;

    let cart = service
        .replace_line_items(owner_id, input.line_items)
        .await?;
    Ok(Json(CartResponse::new("Cart updated", cart)))
}

/// Delete the user's pending cart
#[utoipa::path(
    delete,
    path = "/{user_id}",
    tag = "Cart",
    params(
        ("user_id" = Uuid, Path, description = "Cart owner")
    ),
    responses(
        (status = 200, description = "Cart deleted", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    UuidPath(owner_id): UuidPath,
) -> Result<Json<MessageResponse>, AppError> {
    user.ensure_can_access(owner_id)?;

    service.delete_cart(owner_id).await?;
    Ok(Json(MessageResponse::new("Cart deleted")))
}

/// Confirm the user's pending cart
#[utoipa::path(
    put,
    path = "/{user_id}/confirm",
    tag = "Cart",
    params(
        ("user_id" = Uuid, Path, description = "Cart owner")
    ),
    responses(
        (status = 200, description = "Cart confirmed", body = CartResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn confirm_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    UuidPath(owner_id): UuidPath,
) -> Result<Json<CartResponse>, AppError> {
    user.ensure_can_access(owner_id)?;

    let cart = service.confirm(owner_id).await?;
    Ok(Json(CartResponse::new("Cart confirmed", cart)))
}

/// Cancel the user's pending cart
#[utoipa::path(
    put,
    path = "/{user_id}/cancel",
    tag = "Cart",
    params(
        ("user_id" = Uuid, Path, description = "Cart owner")
    ),
    responses(
        (status = 200, description = "Cart cancelled", body = CartResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn cancel_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    user: AuthUser,
    UuidPath(owner_id): UuidPath,
) -> Result<Json<CartResponse>, AppError> {
    user.ensure_can_access(owner_id)?;

    let cart = service.cancel(owner_id).await?;
    Ok(Json(CartResponse::new("Cart cancelled", cart)))
}
