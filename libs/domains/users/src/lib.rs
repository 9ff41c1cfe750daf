//! Users Domain
//!
//! Accounts, credentials, the shipping address book and password reset.
//!
//! # Features
//!
//! - Registration and login with Argon2 password hashes and JWT cookies
//! - User CRUD for administrators
//! - Address book with a single default address per user
//! - Password reset by emailed six-digit code (in-memory or Redis code store)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Handlers / AuthHandlers  │  ← HTTP endpoints
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ UserService              │  ← Credentials, AddressBook rules
//! │ PasswordResetService     │  ← Codes, email
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ Repository / CodeStore   │  ← Data access (trait + implementations)
//! └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod addresses;
pub mod auth_handlers;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod password;
pub mod password_reset;
pub mod repository;
pub mod service;

pub use addresses::{AddressBook, CreateAddress, ShippingAddress, UpdateAddress};
pub use auth_handlers::{AuthApiDoc, AuthState};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    AuthResponse, CreateUser, LoginRequest, RegisterRequest, UpdateUser, User, UserFilter,
    UserResponse,
};
pub use mongodb::MongoUserRepository;
pub use password_reset::{
    InMemoryCodeStore, PasswordResetService, RedisCodeStore, VerificationCode,
    VerificationCodeStore,
};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
