//! Error identifiers shared by every error body the API returns.
//!
//! A code has three faces: the SCREAMING_SNAKE_CASE name clients match on,
//! a number for logs (1xxx request problems, 2xxx storage, 5xxx encoding)
//! and a fallback message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::Conflict.as_str(), "CONFLICT");
//! assert_eq!(ErrorCode::Conflict.code(), 1008);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    InvalidUuid,
    JsonExtraction,
    NotFound,
    InternalError,
    Unauthorized,
    Forbidden,
    /// The cart, order or account is not in a state that allows the request
    Conflict,
    BadRequest,
    DatabaseError,
    SerdeJsonError,
}

impl ErrorCode {
    const fn entry(self) -> (&'static str, i32, &'static str) {
        match self {
            Self::ValidationError => ("VALIDATION_ERROR", 1001, "Request validation failed"),
            Self::InvalidUuid => ("INVALID_UUID", 1002, "Invalid UUID format"),
            Self::JsonExtraction => ("JSON_EXTRACTION", 1003, "Failed to parse request body"),
            Self::NotFound => ("NOT_FOUND", 1004, "Resource not found"),
            Self::InternalError => ("INTERNAL_ERROR", 1005, "An internal server error occurred"),
            Self::Unauthorized => ("UNAUTHORIZED", 1006, "Authentication required"),
            Self::Forbidden => ("FORBIDDEN", 1007, "Access forbidden"),
            Self::Conflict => ("CONFLICT", 1008, "Request conflicts with the current state"),
            Self::BadRequest => ("BAD_REQUEST", 1012, "Bad request"),
            Self::DatabaseError => ("DATABASE_ERROR", 2003, "Database error occurred"),
            Self::SerdeJsonError => ("SERDE_JSON_ERROR", 5001, "JSON serialization error"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().0
    }

    pub fn code(&self) -> i32 {
        self.entry().1
    }

    pub fn default_message(&self) -> &'static str {
        self.entry().2
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
