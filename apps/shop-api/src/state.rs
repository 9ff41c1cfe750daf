//! Shared application state, built once at startup.

use axum_helpers::JwtAuth;
use database::redis::ConnectionManager;
use email::EmailProvider;
use mongodb::Database;
use std::sync::Arc;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Database,
    /// Present when `REDIS_URL` is configured
    pub redis: Option<ConnectionManager>,
    pub jwt_auth: JwtAuth,
    pub mailer: Arc<dyn EmailProvider>,
}
