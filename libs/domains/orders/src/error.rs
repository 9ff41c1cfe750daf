use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_carts::CartError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::OrderState;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Cart not found: {0}")]
    CartNotFound(Uuid),

    #[error("Cart {0} is not in pending state")]
    CartNotPending(Uuid),

    #[error("Cannot cancel order in state {0}")]
    NotCancellable(OrderState),

    #[error("Transition from {from} to {to} is not allowed")]
    InvalidTransition { from: OrderState, to: OrderState },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => AppError::NotFound("Order not found".to_string()),
            OrderError::CartNotFound(_) => AppError::NotFound("Cart not found".to_string()),
            OrderError::CartNotPending(_) => {
                AppError::Conflict("Cart is not in pending state".to_string())
            }
            OrderError::NotCancellable(_) => {
                AppError::Conflict("Cannot cancel order in current state".to_string())
            }
            err @ OrderError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            OrderError::Validation(msg) => AppError::BadRequest(msg),
            OrderError::Forbidden(msg) => AppError::Forbidden(msg),
            OrderError::Database(msg) => AppError::Database(msg),
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for OrderError {
    fn from(err: mongodb::error::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

impl From<CartError> for OrderError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::NotFound(id) => OrderError::CartNotFound(id),
            CartError::Database(msg) => OrderError::Database(msg),
            other => OrderError::Internal(other.to_string()),
        }
    }
}
