//! API routes
//!
//! Nested under `/api` by `axum_helpers::create_router`.
//!
//! | Prefix | Auth |
//! |---|---|
//! | `/auth` | none |
//! | `/products`, `/categories`, `/reviews` | optional (writes check the caller) |
//! | `/users`, `/carts`, `/orders` | required |

pub mod health;

use axum::{Router, middleware};
use axum_helpers::{jwt_auth_middleware, optional_jwt_auth_middleware};
use domain_carts::{CartService, MongoCartRepository, PricingMode};
use domain_categories::{CategoryService, MongoCategoryRepository};
use domain_orders::{MongoOrderRepository, OrderService};
use domain_products::{MongoProductRepository, ProductPriceCatalog, ProductService};
use domain_reviews::{MongoReviewRepository, ReviewService};
use domain_users::{
    AuthState, InMemoryCodeStore, MongoUserRepository, PasswordResetService, RedisCodeStore,
    UserService, VerificationCodeStore,
};
use email::TemplateEngine;
use mongodb::Database;
use std::sync::Arc;
use tracing::info;

use crate::state::AppState;

/// Create every index the repositories rely on
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoUserRepository::new(db).init_indexes().await?;
    MongoProductRepository::new(db).init_indexes().await?;
    MongoCategoryRepository::new(db).init_indexes().await?;
    MongoReviewRepository::new(db).init_indexes().await?;
    MongoCartRepository::new(db).init_indexes().await?;
    MongoOrderRepository::new(db).init_indexes().await?;
    Ok(())
}

pub fn routes(state: &AppState) -> eyre::Result<Router> {
    let db = &state.db;

    let users = UserService::new(MongoUserRepository::new(db));
    let products = ProductService::new(MongoProductRepository::new(db));

    let mut carts = CartService::new(MongoCartRepository::new(db));
    if state.config.pricing_mode == PricingMode::Catalog {
        carts = carts.with_catalog(Arc::new(ProductPriceCatalog::new(products.clone())));
    }
    info!(pricing_mode = %carts.pricing_mode(), "Cart pricing configured");

    let orders = OrderService::new(MongoOrderRepository::new(db), carts.clone())
        .with_policy(state.config.order_policy);
    info!(policy = %state.config.order_policy, "Order transition policy configured");

    let auth = AuthState {
        service: users.clone(),
        reset: PasswordResetService::new(
            users.clone(),
            code_store(state),
            Arc::clone(&state.mailer),
            TemplateEngine::new()?,
        ),
        jwt_auth: state.jwt_auth.clone(),
        secure_cookies: state.config.environment.secure_cookies(),
    };

    let protected = Router::new()
        .nest("/users", domain_users::handlers::router(users))
        .nest("/cart", domain_carts::handlers::router(carts))
        .nest("/orders", domain_orders::handlers::router(orders))
        .layer(middleware::from_fn_with_state(
            state.jwt_auth.clone(),
            jwt_auth_middleware,
        ));

    let catalog = Router::new()
        .nest("/products", domain_products::handlers::router(products))
        .nest(
            "/categories",
            domain_categories::handlers::router(CategoryService::new(
                MongoCategoryRepository::new(db),
            )),
        )
        .nest(
            "/reviews",
            domain_reviews::handlers::router(ReviewService::new(MongoReviewRepository::new(db))),
        )
        .layer(middleware::from_fn_with_state(
            state.jwt_auth.clone(),
            optional_jwt_auth_middleware,
        ));

    Ok(Router::new()
        .nest("/auth", domain_users::auth_handlers::router(auth))
        .merge(protected)
        .merge(catalog)
        .merge(health::router(state.clone())))
}

fn code_store(state: &AppState) -> Arc<dyn VerificationCodeStore> {
    match (&state.redis, &state.config.redis) {
        (Some(connection), Some(config)) => {
            info!("Password reset codes stored in Redis");
            Arc::new(RedisCodeStore::new(
                connection.clone(),
                format!("{}:", config.key_prefix),
            ))
        }
        _ => {
            info!("Password reset codes stored in memory");
            Arc::new(InMemoryCodeStore::new())
        }
    }
}
