#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_required};

/// Redis connection settings
#[derive(Clone, Debug)]
pub struct RedisConfig {
    /// redis://[username:password@]host[:port][/db]
    pub url: String,
    /// Prefix applied to every key written by the application
    pub key_prefix: String,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_prefix: "shop".to_string(),
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// `REDIS_URL` is optional for the API: `None` when unset
    #[cfg(feature = "config")]
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        match std::env::var("REDIS_URL") {
            Ok(_) => Self::from_env().map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// - `REDIS_URL` (required)
/// - `REDIS_KEY_PREFIX` (default "shop")
#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_required("REDIS_URL")?;
        let key_prefix = core_config::env_or_default("REDIS_KEY_PREFIX", "shop");
        Ok(Self { url, key_prefix })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_config_new() {
        let config = RedisConfig::new("redis://127.0.0.1:6379").with_key_prefix("test");
        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert_eq!(config.key_prefix, "test");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_redis_config_optional_when_unset() {
        temp_env::with_var_unset("REDIS_URL", || {
            assert!(RedisConfig::from_env_optional().unwrap().is_none());
            assert!(RedisConfig::from_env().is_err());
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_redis_config_from_env() {
        temp_env::with_vars(
            [
                ("REDIS_URL", Some("redis://cache:6379")),
                ("REDIS_KEY_PREFIX", None),
            ],
            || {
                let config = RedisConfig::from_env_optional().unwrap().unwrap();
                assert_eq!(config.url, "redis://cache:6379");
                assert_eq!(config.key_prefix, "shop");
            },
        );
    }
}
