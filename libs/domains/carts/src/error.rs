use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(Uuid),

    #[error("No pending cart for user {0}")]
    NoPendingCart(Uuid),

    #[error("User {0} already has a pending cart")]
    PendingCartExists(Uuid),

    #[error("Product not found in catalog: {0}")]
    UnknownProduct(Uuid),

    #[error("Cart total is too large")]
    TotalOverflow,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CartResult<T> = Result<T, CartError>;

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::NotFound(id) => AppError::NotFound(format!("Cart {} not found", id)),
            CartError::NoPendingCart(_) => AppError::NotFound("Cart not found".to_string()),
            CartError::PendingCartExists(_) => {
                AppError::Conflict("User already has a pending cart".to_string())
            }
            CartError::UnknownProduct(id) => {
                AppError::BadRequest(format!("Product {} does not exist", id))
            }
            CartError::TotalOverflow => {
                AppError::BadRequest("Cart total exceeds the supported amount".to_string())
            }
            CartError::Validation(msg) => AppError::BadRequest(msg),
            CartError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for CartError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CartError {
    fn from(err: mongodb::error::Error) -> Self {
        CartError::Database(err.to_string())
    }
}
