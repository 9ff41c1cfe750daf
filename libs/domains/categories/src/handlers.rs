//! HTTP handlers for the Categories API

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
    AppError, AuthUser, Role, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CategoriesResponse, Category, CategoryInput, CategoryResponse};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

const CATALOG_EDITORS: &[Role] = &[Role::Admin, Role::Employee];

#[derive(OpenApi)]
#[openapi(
    paths(list_categories, create_category, rename_category, delete_category),
    components(
        schemas(Category, CategoryInput, CategoryResponse, CategoriesResponse),
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
        (name = "Categories", description = "Product categories")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<CategoryService<R>>;

/// Listing is public. Writes need an Admin or Employee [`AuthUser`].
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}", put(rename_category).delete(delete_category))
        .with_state(Arc::new(service))
}

/// List all categories
#[utoipa::path(
    get,
    path = "",
    tag = "Categories",
    responses(
        (status = 200, description = "All categories", body = CategoriesResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = service.list_categories().await?;
    Ok(Json(CategoriesResponse {
        message: "Categories retrieved".to_string(),
        categories,
    }))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = "Categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(CATALOG_EDITORS)?;

    let category = service.create_category(&input.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse::new("Category created", category)),
    ))
}

/// Rename a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn rename_category<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> Result<Json<CategoryResponse>, AppError> {
    user.require_any(CATALOG_EDITORS)?;

    let category = service.rename_category(id, &input.name).await?;
    Ok(Json(CategoryResponse::new("Category updated", category)))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = CategoryResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<R: CategoryRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<CategoryResponse>, AppError> {
    user.require_any(CATALOG_EDITORS)?;

    let category = service.delete_category(id).await?;
    Ok(Json(CategoryResponse::new("Category deleted", category)))
}
