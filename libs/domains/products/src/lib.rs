//! Products Domain
//!
//! The storefront catalog: products with a price in cents, a stock count and
//! the category they are listed under. Reads are public, writes are staff only.
//!
//! Product prices also back the cart engine when `PRICING_MODE=catalog`,
//! through [`ProductPriceCatalog`].
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//!
//! # async fn mount(db: mongodb::Database) -> domain_products::ProductResult<axum::Router> {
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//!
//! let service = ProductService::new(repository);
//! Ok(axum::Router::new().nest("/products", handlers::router(service)))
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use catalog::ProductPriceCatalog;
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{CreateProduct, Product, ProductFilter, UpdateProduct};
pub use mongodb::MongoProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
