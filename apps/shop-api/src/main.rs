use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use email::{EmailProvider, MockSmtpProvider, SmtpProvider};
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use axum_helpers::JwtAuth;
use config::{Config, EmailBackend};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(database = %config.mongodb.database, "Connecting to MongoDB");
    let db =
        database::mongodb::connect_database_with_retry(&config.mongodb, RetryConfig::default())
            .await?;
    api::init_indexes(&db).await?;

    let redis = match config.redis {
        Some(ref redis_config) => Some(
            database::redis::connect_with_retry(redis_config, RetryConfig::default()).await?,
        ),
        None => None,
    };

    let mailer: Arc<dyn EmailProvider> = match config.email_backend {
        EmailBackend::Smtp => Arc::new(SmtpProvider::new(config.smtp.clone())?),
        EmailBackend::Mock => {
            warn!("EMAIL_BACKEND=mock: emails are not delivered");
            Arc::new(MockSmtpProvider::new())
        }
    };
    if let Err(e) = mailer.verify().await {
        warn!(provider = mailer.name(), error = %e, "Email transport unreachable at startup");
    }

    let state = AppState {
        jwt_auth: JwtAuth::new(&config.jwt),
        config,
        db,
        redis,
        mailer,
    };

    let router = create_router::<openapi::ApiDoc>(api::routes(&state)?)?;
    let app = router.merge(health_router(state.config.app.clone()));

    info!(name = state.config.app.name, version = state.config.app.version, "Starting Shop API");

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, async move {
        info!("Shutting down: closing MongoDB connections");
        drop(state);
    })
    .await?;

    info!("Shop API shutdown complete");
    Ok(())
}
