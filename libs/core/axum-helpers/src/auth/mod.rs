//! Authentication gateway.
//!
//! - [`JwtAuth`]: HS256 token issuing and verification
//! - [`jwt_auth_middleware`]: reads the bearer credential, verifies it and
//!   inserts an [`AuthUser`] into the request extensions
//! - [`AuthUser`]: extractor plus the owner-or-admin checks used by services
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//! let protected = Router::new()
//!     .route("/orders", get(list_orders))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod role;
pub mod user;

pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims};
pub use middleware::{AUTH_COOKIE, AUTH_HEADER, jwt_auth_middleware, optional_jwt_auth_middleware};
pub use role::Role;
pub use user::AuthUser;
