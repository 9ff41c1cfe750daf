use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(Uuid),

    #[error("Only the author or an administrator may change review {0}")]
    NotAuthor(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ReviewResult<T> = Result<T, ReviewError>;

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(_) => AppError::NotFound("Review not found".to_string()),
            ReviewError::NotAuthor(_) => {
                AppError::Forbidden("Only the author may change this review".to_string())
            }
            ReviewError::Validation(msg) => AppError::BadRequest(msg),
            ReviewError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ReviewError {
    fn from(err: mongodb::error::Error) -> Self {
        ReviewError::Database(err.to_string())
    }
}
