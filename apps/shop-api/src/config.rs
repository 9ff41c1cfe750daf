use core_config::{AppInfo, FromEnv, app_info, env_parse_or, server::ServerConfig};
use database::mongodb::MongoConfig;
use database::redis::RedisConfig;
use domain_carts::PricingMode;
use domain_orders::TransitionPolicy;
use email::SmtpConfig;
use strum::{Display, EnumString};

use axum_helpers::JwtConfig;
pub use core_config::Environment;

/// Where outgoing email goes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EmailBackend {
    #[default]
    Smtp,
    /// Kept in memory and logged; nothing leaves the process
    Mock,
}

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub mongodb: MongoConfig,
    /// Password reset codes live in Redis when set, in memory otherwise
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub email_backend: EmailBackend,
    pub smtp: SmtpConfig,
    pub order_policy: TransitionPolicy,
    pub pricing_mode: PricingMode,
}

impl Config {
    /// - `EMAIL_BACKEND`: smtp (default) or mock
    /// - `ORDER_TRANSITION_POLICY`: permissive (default), terminal_locked or strict
    /// - `CART_PRICING_MODE`: trusted (default) or catalog
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let mongodb = MongoConfig::from_env()?.with_app_name(app.name);

        Ok(Self {
            app,
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            mongodb,
            redis: RedisConfig::from_env_optional()?,
            jwt: JwtConfig::from_env()?,
            email_backend: env_parse_or("EMAIL_BACKEND", EmailBackend::default())?,
            smtp: SmtpConfig::from_env()?,
            order_policy: env_parse_or("ORDER_TRANSITION_POLICY", TransitionPolicy::default())?,
            pricing_mode: env_parse_or("CART_PRICING_MODE", PricingMode::default())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [(&str, Option<&str>); 3] = [
        ("MONGODB_URL", Some("mongodb://localhost:27017")),
        ("MONGODB_DATABASE", Some("shop_test")),
        ("JWT_SECRET", Some("test-secret-key-that-is-long-enough-for-hs256")),
    ];

    #[test]
    fn test_defaults() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("REDIS_URL", None),
            ("EMAIL_BACKEND", None),
            ("ORDER_TRANSITION_POLICY", None),
            ("CART_PRICING_MODE", None),
        ]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert!(config.redis.is_none());
            assert_eq!(config.email_backend, EmailBackend::Smtp);
            assert_eq!(config.order_policy, TransitionPolicy::Permissive);
            assert_eq!(config.pricing_mode, PricingMode::Trusted);
            assert_eq!(config.mongodb.app_name.as_deref(), Some("shop_api"));
        });
    }

    #[test]
    fn test_policies_from_env() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("EMAIL_BACKEND", Some("MOCK")),
            ("ORDER_TRANSITION_POLICY", Some("strict")),
            ("CART_PRICING_MODE", Some("catalog")),
        ]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.email_backend, EmailBackend::Mock);
            assert_eq!(config.order_policy, TransitionPolicy::Strict);
            assert_eq!(config.pricing_mode, PricingMode::Catalog);
        });
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("ORDER_TRANSITION_POLICY", Some("anything_goes")));

        temp_env::with_vars(vars, || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("ORDER_TRANSITION_POLICY"));
        });
    }

    #[test]
    fn test_missing_jwt_secret() {
        let mut vars = REQUIRED.to_vec();
        vars[2] = ("JWT_SECRET", None);

        temp_env::with_vars(vars, || {
            assert!(Config::from_env().is_err());
        });
    }
}
