//! Orders Domain
//!
//! The order engine. An order is placed from exactly one pending cart and
//! moves through the states below; payment confirmation and cancellation
//! are dedicated operations, every other change goes through
//! [`TransitionPolicy`].
//!
//! ```text
//!            ┌────────────┐  payment completed  ┌────────────┐
//!  place ──► │ Pendiente  │ ──────────────────► │ Confirmado │ ─► Procesando ─► Enviado ─► Entregado
//!            └─────┬──────┘                     └────────────┘
//!                  │ payment failed
//!                  ▼
//!            Pago Fallido            any non-terminal state ── cancel ──► Cancelado
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_carts::{CartService, MongoCartRepository};
//! use domain_orders::{handlers, MongoOrderRepository, OrderService, TransitionPolicy};
//!
//! # async fn example(db: mongodb::Database) {
//! let carts = CartService::new(MongoCartRepository::new(&db));
//! let service = OrderService::new(MongoOrderRepository::new(&db), carts)
//!     .with_policy(TransitionPolicy::TerminalLocked);
//!
//! let router = handlers::router(service);
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod transitions;

pub use error::{OrderError, OrderResult};
pub use handlers::ApiDoc;
pub use models::{
    AddressInput, CancelOrder, ConfirmPayment, DeliveryStatus, Order, OrderAddress,
    OrderListResponse, OrderResponse, OrderState, OrderStats, OrderStatsResponse, PaymentMethod,
    PaymentStatus, PlaceOrder, StateStats, UpdateOrder,
};
pub use mongodb::MongoOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
pub use transitions::TransitionPolicy;
