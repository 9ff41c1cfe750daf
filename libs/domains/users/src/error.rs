use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Address not found: {0}")]
    AddressNotFound(Uuid),

    #[error("At least one address is required")]
    LastAddress,

    #[error("Invalid or expired verification code")]
    InvalidResetCode,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Code store error: {0}")]
    CodeStore(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::DuplicateEmail(_) => AppError::Conflict("User already exists".to_string()),
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            UserError::AddressNotFound(id) => {
                AppError::NotFound(format!("Address {} not found", id))
            }
            UserError::LastAddress => {
                AppError::BadRequest("At least one address is required".to_string())
            }
            UserError::InvalidResetCode => {
                AppError::BadRequest("Invalid or expired verification code".to_string())
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::PasswordHash(msg) => {
                AppError::InternalServerError(format!("Password hashing failed: {}", msg))
            }
            UserError::Email(msg) => {
                AppError::InternalServerError(format!("Failed to send email: {}", msg))
            }
            UserError::Token(msg) => {
                AppError::InternalServerError(format!("Failed to issue token: {}", msg))
            }
            UserError::CodeStore(msg) => {
                AppError::InternalServerError(format!("Verification code store failed: {}", msg))
            }
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

impl From<redis::RedisError> for UserError {
    fn from(err: redis::RedisError) -> Self {
        UserError::CodeStore(err.to_string())
    }
}
