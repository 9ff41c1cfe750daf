//! # Axum Helpers
//!
//! Shared HTTP plumbing for the storefront services.
//!
//! - **[`auth`]**: JWT issuing/verification, auth middleware, [`AuthUser`] extractor, roles
//! - **[`errors`]**: [`AppError`] and the structured [`ErrorResponse`] body
//! - **[`extractors`]**: [`UuidPath`] and [`ValidatedJson`]
//! - **[`server`]**: router assembly with OpenAPI UIs, health checks, graceful shutdown
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//!
//! let router = create_router::<ApiDoc>(api_routes)?;
//! create_production_app(router, &ServerConfig::from_env()?, async {}).await?;
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod server;

pub use auth::{
    AUTH_COOKIE, AuthUser, JwtAuth, JwtClaims, JwtConfig, Role, jwt_auth_middleware,
    optional_jwt_auth_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};
