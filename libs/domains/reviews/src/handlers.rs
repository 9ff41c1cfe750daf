//! HTTP handlers for the Reviews API

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    AppError, AuthUser, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    CreateReview, MessageResponse, Review, ReviewFilter, ReviewResponse, ReviewsResponse,
    UpdateReview,
};
use crate::repository::ReviewRepository;
use crate::service::ReviewService;

#[derive(OpenApi)]
#[openapi(
    paths(list_reviews, create_review, get_review, update_review, delete_review),
    components(
        schemas(
            Review, CreateReview, UpdateReview, ReviewFilter,
            ReviewResponse, ReviewsResponse, MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Reviews", description = "Product reviews")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<ReviewService<R>>;

/// Reads are public; writing needs an [`AuthUser`].
pub fn router<R: ReviewRepository + 'static>(service: ReviewService<R>) -> Router {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
        .with_state(Arc::new(service))
}

/// List reviews, optionally for one product
#[utoipa::path(
    get,
    path = "",
    tag = "Reviews",
    params(ReviewFilter),
    responses(
        (status = 200, description = "Reviews, newest first", body = ReviewsResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_reviews<R: ReviewRepository>(
    State(service): State<SharedService<R>>,
    Query(filter): Query<ReviewFilter>,
) -> Result<Json<ReviewsResponse>, AppError> {
    let reviews = service.list_reviews(filter).await?;
    Ok(Json(ReviewsResponse {
        message: "Reviews retrieved".to_string(),
        reviews,
    }))
}

/// Post a review as the caller
#[utoipa::path(
    post,
    path = "",
    tag = "Reviews",
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review saved", body = ReviewResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_review<R: ReviewRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateReview>,
) -> Result<impl IntoResponse, AppError> {
    let review = service.create_review(user.id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse::new("Review saved", review)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Reviews",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review found", body = ReviewResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_review<R: ReviewRepository>(
    State(service): State<SharedService<R>>,
    UuidPath(id): UuidPath,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = service.get_review(id).await?;
    Ok(Json(ReviewResponse::new("Review retrieved", review)))
}

/// Change rating or comment (author or admin)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Reviews",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_review<R: ReviewRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateReview>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = service.update_review(user, id, input).await?;
    Ok(Json(ReviewResponse::new("Review updated", review)))
}

/// Delete a review (author or admin)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Reviews",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_review<R: ReviewRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<MessageResponse>, AppError> {
    service.delete_review(user, id).await?;
    Ok(Json(MessageResponse {
        message: "Review deleted".to_string(),
    }))
}
