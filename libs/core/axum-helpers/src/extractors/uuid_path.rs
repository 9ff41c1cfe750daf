//! `{id}` path segment parsed as a [`Uuid`].

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// Resource id taken from the route's only path parameter.
///
/// Anything that is not a UUID becomes a 400 before the handler runs, so
/// `/orders/latest` never reaches a repository lookup.
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => raw,
            Err(rejection) => return Err(AppError::BadRequest(rejection.body_text())),
        };

        match Uuid::parse_str(&raw) {
            Ok(id) => Ok(Self(id)),
            Err(_) => Err(AppError::BadRequest(format!("Invalid UUID: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/orders/{id}",
            get(|UuidPath(id): UuidPath| async move { id.to_string() }),
        )
    }

    #[tokio::test]
    async fn test_valid_uuid_reaches_handler() {
        let id = Uuid::now_v7();
        let response = app()
            .oneshot(
                Request::get(format!("/orders/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_uuid_is_bad_request() {
        let response = app()
            .oneshot(Request::get("/orders/latest").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
