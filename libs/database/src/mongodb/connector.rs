use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Build a client from `config` and verify it with a `ping`
pub async fn connect(config: &MongoConfig) -> DatabaseResult<Client> {
    info!(database = %config.database, "Connecting to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));
    options.app_name = config.app_name.clone();

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// Connect and return the configured database handle
pub async fn connect_database(config: &MongoConfig) -> DatabaseResult<Database> {
    let client = connect(config).await?;
    Ok(client.database(&config.database))
}

/// [`connect_database`] with exponential backoff, for startup ordering in containers
pub async fn connect_database_with_retry(
    config: &MongoConfig,
    retry_config: RetryConfig,
) -> DatabaseResult<Database> {
    retry_with_backoff("mongodb connect", || connect_database(config), retry_config).await
}
