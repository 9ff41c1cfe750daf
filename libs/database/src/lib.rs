//! Connection management for the storefront's backing stores.
//!
//! # Features
//!
//! - `mongodb` (default): primary document store
//! - `redis` (default): short-lived data such as password reset codes
//! - `config` (default): `core_config::FromEnv` for the config structs
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::common::RetryConfig;
//! use database::mongodb::{MongoConfig, connect_database_with_retry};
//!
//! let config = MongoConfig::from_env()?;
//! let db = connect_database_with_retry(&config, RetryConfig::new().with_max_retries(5)).await?;
//! let carts = db.collection::<Cart>("carts");
//! ```

pub mod common;

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
