use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use super::RedisConfig;
use crate::common::{RetryConfig, retry_with_backoff};

/// Open a reconnecting connection manager and verify it with `PING`
pub async fn connect(config: &RedisConfig) -> redis::RedisResult<ConnectionManager> {
    info!("Connecting to Redis");

    let client = Client::open(config.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;

    let mut conn = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;

    info!("Connected to Redis");
    Ok(manager)
}

pub async fn connect_with_retry(
    config: &RedisConfig,
    retry_config: RetryConfig,
) -> redis::RedisResult<ConnectionManager> {
    retry_with_backoff("redis connect", || connect(config), retry_config).await
}

pub async fn check_health(manager: &ConnectionManager) -> bool {
    let mut conn = manager.clone();
    redis::cmd("PING")
        .query_async::<String>(&mut conn)
        .await
        .is_ok()
}
