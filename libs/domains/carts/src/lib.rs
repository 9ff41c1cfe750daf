//! Carts Domain
//!
//! The cart engine: every customer owns at most one pending cart, whose total
//! is always the sum of its line subtotals. Orders consume pending carts and
//! flip them to confirmed; cancelling an order reopens the cart.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, owner/admin checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Pending-cart rule, totals, pricing policy
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Cart, LineItem, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_carts::{handlers, CartService, MongoCartRepository};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("storefront");
//!
//! let repository = MongoCartRepository::new(&db);
//! repository.init_indexes().await?;
//! let service = CartService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{CartError, CartResult};
pub use handlers::ApiDoc;
pub use models::{
    Cart, CartResponse, CartStatus, CartsResponse, CreateCart, LineItem, MessageResponse,
    UpdateCart,
};
pub use mongodb::MongoCartRepository;
pub use repository::{CartRepository, InMemoryCartRepository};
pub use service::{CartService, PriceCatalog, PricingMode};
