//! HTTP handlers for the Orders API

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    AppError, AuthUser, UuidPath, ValidatedJson,
};
use domain_carts::CartRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    AddressInput, CancelOrder, ConfirmPayment, DeliveryStatus, MessageResponse, Order,
    OrderAddress, OrderListResponse, OrderResponse, OrderState, OrderStats, OrderStatsResponse,
    PaymentMethod, PaymentStatus, PlaceOrder, StateStats, UpdateOrder,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

/// OpenAPI documentation for the Orders API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_orders,
        place_order,
        order_stats,
        list_user_orders,
        get_order,
        update_order,
        delete_order,
        confirm_payment,
        cancel_order,
    ),
    components(
        schemas(
            Order, OrderAddress, AddressInput, OrderState, PaymentStatus, DeliveryStatus,
            PaymentMethod, PlaceOrder, ConfirmPayment, CancelOrder, UpdateOrder,
            OrderStats, StateStats, OrderResponse, OrderListResponse, OrderStatsResponse,
            MessageResponse
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
        (name = "Orders", description = "Order placement, payment and fulfilment")
    )
)]
pub struct ApiDoc;

type SharedService<O, C> = Arc<OrderService<O, C>>;

/// Create the orders router. Expects [`AuthUser`] in the request extensions.
pub fn router<O, C>(service: OrderService<O, C>) -> Router
where
    O: OrderRepository + 'static,
    C: CartRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_orders).post(place_order))
        .route("/stats", get(order_stats))
        .route("/user/{user_id}", get(list_user_orders))
        .route(
            "/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/{id}/payment", put(confirm_payment))
        .route("/{id}/cancel", put(cancel_order))
        .with_state(shared_service)
}

/// List every order (administrators)
#[utoipa::path(
    get,
    path = "",
    tag = "Orders",
    responses(
        (status = 200, description = "All orders, newest first", body = OrderListResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders<O: OrderRepository, C: CartRepository>(
    State(service): State<SharedService<O, C>>,
    user: AuthUser,
) -> Result<Json<OrderListResponse>, AppError> {
    let orders = service.list_orders(&user).await?;
    Ok(Json(OrderListResponse::new(orders)))
}

/// Place an order from a pending cart
#[utoipa::path(
    post,
    path = "",
    tag = "Orders",
    request_body = PlaceOrder,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn place_order<O: OrderRepository, C: CartRepository>(
    State(service): State<SharedService<O, C>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<PlaceOrder>,
) -> Result<impl IntoResponse, AppError> {
    let order = service.place_order(&user, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::new("Order created successfully", order)),
    ))
}

/// Order counts and revenue (administrators)
#[utoipa::path(
    get,
    path = "/stats",
    tag = "Orders",
    responses(
        (status = 200, description = "Order statistics", body = OrderStatsResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn order_stats<O: OrderRepository, C: CartRepository>(
    State(service): State<SharedService<O, C>>,
    user: AuthUser,
) -> Result<Json<OrderStatsResponse>, AppError> {
    let stats = service.stats(&user).await?;
    Ok(Json(OrderStatsResponse {
        message: "Statistics retrieved successfully".to_string(),
        data: stats,
    }))
}

/// Orders of one user
#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "Orders",
    params(
        ("user_id" = Uuid, Path, description = "Order owner")
    ),
    responses(
        (status = 200, description = "Orders of the user", body = OrderListResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_user_orders<O: OrderRepository, C: CartRepository>(
    State(service): State<SharedService<O, C>>,
    user: AuthUser,
    UuidPath(user_id): UuidPath,
) -> Result<Json<OrderListResponse>, AppError> {
    let orders = service.list_orders_for_user(&user, user_id).await?;
    Ok(Json(OrderListResponse::new(orders)))
}

/// Get an order
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<O: OrderRepository, C: CartRepository>(
    State(service): State<SharedService<O, C>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<OrderResponse>, AppError> {
    let order = service.get_order(&user, id).await?;
    Ok(Json(OrderResponse::new("Order retrieved successfully", order)))
}

/// Update state, payment/delivery status, tracking number, delivery date or notes.
///
/// Setting `Cancelado` behaves like the cancel endpoint: it stamps the
/// cancellation and reopens the cart.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order<O: OrderRepository, C: CartRepository>(
    State(service): State<SharedService<O, C>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrder>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = service.update_status(&user, id, input).await?;
    Ok(Json(OrderResponse::new("Order updated successfully", order)))
}

/// Delete an order (administrators)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_order<O: OrderRepository, C: CartRepository>(
    State(service): State<SharedService<O, C>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<MessageResponse>, AppError> {
    service.delete_order(&user, id).await?;
    Ok(Json(MessageResponse {
        message: "Order deleted successfully".to_string(),
    }))
}

/// Record the payment outcome of an order
#[utoipa::path(
    put,
    path = "/{id}/payment",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = ConfirmPayment,
    responses(
        (status = 200, description = "Payment status updated", body = OrderResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn confirm_payment<O: OrderRepository, C: CartRepository>(
    State(service): State<SharedService<O, C>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<ConfirmPayment>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = service.confirm_payment(&user, id, input).await?;
    Ok(Json(OrderResponse::new(
        "Payment status updated successfully",
        order,
    )))
}

/// Cancel an order and reopen its cart
#[utoipa::path(
    put,
    path = "/{id}/cancel",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = CancelOrder,
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn cancel_order<O: OrderRepository, C: CartRepository>(
    State(service): State<SharedService<O, C>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    body: Option<Json<CancelOrder>>,
) -> Result<Json<OrderResponse>, AppError> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let order = service.cancel(&user, id, input).await?;
    Ok(Json(OrderResponse::new("Order cancelled successfully", order)))
}
