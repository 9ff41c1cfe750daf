//! Server infrastructure: router assembly, health endpoints, graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(router, &ServerConfig::from_env()?, async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod security;
pub mod shutdown;

pub use app::{cors_layer_from_origins, create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use security::security_headers;
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
