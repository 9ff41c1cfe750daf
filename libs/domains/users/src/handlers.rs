//! HTTP handlers for users and address books

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    AppError, AuthUser, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::addresses::{CreateAddress, ShippingAddress, UpdateAddress};
use crate::models::{
    AddressEnvelope, AddressesEnvelope, CreateUser, MessageResponse, UpdateUser, UserEnvelope,
    UserFilter, UserResponse, UsersEnvelope,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        me,
        list_my_addresses,
        add_my_address,
        update_my_address,
        remove_my_address,
        set_my_default_address,
        get_user,
        update_user,
        delete_user,
        list_user_addresses,
        add_user_address,
        update_user_address,
        remove_user_address,
        set_user_default_address,
    ),
    components(
        schemas(
            UserResponse, CreateUser, UpdateUser, UserFilter, UserEnvelope, UsersEnvelope,
            ShippingAddress, CreateAddress, UpdateAddress, AddressEnvelope, AddressesEnvelope,
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
        (name = "Users", description = "User accounts"),
        (name = "Addresses", description = "Shipping address book")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<UserService<R>>;

/// Create the users router. Expects [`AuthUser`] in the request extensions.
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(me))
        .route(
            "/addresses",
            get(list_my_addresses).post(add_my_address),
        )
        .route(
            "/addresses/{address_id}",
            put(update_my_address).delete(remove_my_address),
        )
        .route("/addresses/{address_id}/default", put(set_my_default_address))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/{id}/addresses",
            get(list_user_addresses).post(add_user_address),
        )
        .route(
            "/{id}/addresses/{address_id}",
            put(update_user_address).delete(remove_user_address),
        )
        .route(
            "/{id}/addresses/{address_id}/default",
            put(set_user_default_address),
        )
        .with_state(shared_service)
}

/// List users (administrators)
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(UserFilter),
    responses(
        (status = 200, description = "Users, newest first", body = UsersEnvelope),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    Query(filter): Query<UserFilter>,
) -> Result<Json<UsersEnvelope>, AppError> {
    user.require_admin()?;
    let (users, total) = service.list_users(filter).await?;
    Ok(Json(UsersEnvelope {
        message: "Users retrieved successfully".to_string(),
        users,
        total,
    }))
}

/// Create a user with any role (administrators)
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    user.require_admin()?;
    let created = service.create_user(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope::new("User created successfully", created)),
    ))
}

/// The authenticated user
#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserEnvelope),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn me<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
) -> Result<Json<UserEnvelope>, AppError> {
    let found = service.get_user(user.id).await?;
    Ok(Json(UserEnvelope::new("User retrieved successfully", found)))
}

/// Get a user (self or administrators)
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<UserEnvelope>, AppError> {
    user.ensure_can_access(id)?;
    let found = service.get_user(id).await?;
    Ok(Json(UserEnvelope::new("User retrieved successfully", found)))
}

/// Update a user. Only administrators may change roles.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> Result<Json<UserEnvelope>, AppError> {
    user.ensure_can_access(id)?;
    if input.role.is_some() {
        user.require_admin()?;
    }
    let updated = service.update_user(id, input).await?;
    Ok(Json(UserEnvelope::new("User updated successfully", updated)))
}

/// Delete a user (administrators)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<MessageResponse>, AppError> {
    user.require_admin()?;
    service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

// Address book. The `/addresses` routes act on the caller's own book and the
// `/{id}/addresses` routes on any book the caller may access.

async fn addresses_of<R: UserRepository>(
    service: &UserService<R>,
    owner: Uuid,
) -> Result<Json<AddressesEnvelope>, AppError> {
    let addresses = service.list_addresses(owner).await?;
    Ok(Json(AddressesEnvelope {
        message: "Addresses retrieved successfully".to_string(),
        addresses,
    }))
}

async fn add_to<R: UserRepository>(
    service: &UserService<R>,
    owner: Uuid,
    input: CreateAddress,
) -> Result<(StatusCode, Json<AddressEnvelope>), AppError> {
    let address = service.add_address(owner, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddressEnvelope {
            message: "Address added successfully".to_string(),
            address,
        }),
    ))
}

fn address_reply(message: &str, address: ShippingAddress) -> Json<AddressEnvelope> {
    Json(AddressEnvelope {
        message: message.to_string(),
        address,
    })
}

/// List the caller's addresses
#[utoipa::path(
    get,
    path = "/addresses",
    tag = "Addresses",
    responses(
        (status = 200, description = "Addresses in insertion order", body = AddressesEnvelope),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn list_my_addresses<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
) -> Result<Json<AddressesEnvelope>, AppError> {
    addresses_of(&service, user.id).await
}

/// Add an address to the caller's book
#[utoipa::path(
    post,
    path = "/addresses",
    tag = "Addresses",
    request_body = CreateAddress,
    responses(
        (status = 201, description = "Address added", body = AddressEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn add_my_address<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateAddress>,
) -> Result<impl IntoResponse, AppError> {
    add_to(&service, user.id, input).await
}

/// Edit one of the caller's addresses
#[utoipa::path(
    put,
    path = "/addresses/{address_id}",
    tag = "Addresses",
    params(
        ("address_id" = Uuid, Path, description = "Address ID")
    ),
    request_body = UpdateAddress,
    responses(
        (status = 200, description = "Address updated", body = AddressEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_my_address<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(address_id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateAddress>,
) -> Result<Json<AddressEnvelope>, AppError> {
    let address = service.update_address(user.id, address_id, input).await?;
    Ok(address_reply("Address updated successfully", address))
}

/// Remove one of the caller's addresses
#[utoipa::path(
    delete,
    path = "/addresses/{address_id}",
    tag = "Addresses",
    params(
        ("address_id" = Uuid, Path, description = "Address ID")
    ),
    responses(
        (status = 200, description = "Address removed", body = AddressEnvelope),
        (status = 400, description = "Last remaining address"),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn remove_my_address<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(address_id): UuidPath,
) -> Result<Json<AddressEnvelope>, AppError> {
    let address = service.remove_address(user.id, address_id).await?;
    Ok(address_reply("Address removed successfully", address))
}

/// Make one of the caller's addresses the default
#[utoipa::path(
    put,
    path = "/addresses/{address_id}/default",
    tag = "Addresses",
    params(
        ("address_id" = Uuid, Path, description = "Address ID")
    ),
    responses(
        (status = 200, description = "Default address set", body = AddressEnvelope),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn set_my_default_address<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(address_id): UuidPath,
) -> Result<Json<AddressEnvelope>, AppError> {
    let address = service.set_default_address(user.id, address_id).await?;
    Ok(address_reply("Default address updated successfully", address))
}

/// List a user's addresses
#[utoipa::path(
    get,
    path = "/{id}/addresses",
    tag = "Addresses",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Addresses in insertion order", body = AddressesEnvelope),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn list_user_addresses<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<AddressesEnvelope>, AppError> {
    user.ensure_can_access(id)?;
    addresses_of(&service, id).await
}

/// Add an address to a user's book
#[utoipa::path(
    post,
    path = "/{id}/addresses",
    tag = "Addresses",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = CreateAddress,
    responses(
        (status = 201, description = "Address added", body = AddressEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn add_user_address<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<CreateAddress>,
) -> Result<impl IntoResponse, AppError> {
    user.ensure_can_access(id)?;
    add_to(&service, id, input).await
}

/// Edit an address in a user's book
#[utoipa::path(
    put,
    path = "/{id}/addresses/{address_id}",
    tag = "Addresses",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("address_id" = Uuid, Path, description = "Address ID")
    ),
    request_body = UpdateAddress,
    responses(
        (status = 200, description = "Address updated", body = AddressEnvelope),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_user_address<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    Path((id, address_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(input): ValidatedJson<UpdateAddress>,
) -> Result<Json<AddressEnvelope>, AppError> {
    user.ensure_can_access(id)?;
    let address = service.update_address(id, address_id, input).await?;
    Ok(address_reply("Address updated successfully", address))
}

/// Remove an address from a user's book
#[utoipa::path(
    delete,
    path = "/{id}/addresses/{address_id}",
    tag = "Addresses",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("address_id" = Uuid, Path, description = "Address ID")
    ),
    responses(
        (status = 200, description = "Address removed", body = AddressEnvelope),
        (status = 400, description = "Last remaining address"),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn remove_user_address<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    Path((id, address_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AddressEnvelope>, AppError> {
    user.ensure_can_access(id)?;
    let address = service.remove_address(id, address_id).await?;
    Ok(address_reply("Address removed successfully", address))
}

/// Make an address the default in a user's book
#[utoipa::path(
    put,
    path = "/{id}/addresses/{address_id}/default",
    tag = "Addresses",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("address_id" = Uuid, Path, description = "Address ID")
    ),
    responses(
        (status = 200, description = "Default address set", body = AddressEnvelope),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn set_user_default_address<R: UserRepository>(
    State(service): State<SharedService<R>>,
    user: AuthUser,
    Path((id, address_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AddressEnvelope>, AppError> {
    user.ensure_can_access(id)?;
    let address = service.set_default_address(id, address_id).await?;
    Ok(address_reply("Default address updated successfully", address))
}
