//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "Storefront REST API: accounts, catalog, carts and orders"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/auth", api = domain_users::AuthApiDoc),
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/api/products", api = domain_products::ApiDoc),
        (path = "/api/categories", api = domain_categories::ApiDoc),
        (path = "/api/reviews", api = domain_reviews::ApiDoc),
        (path = "/api/cart", api = domain_carts::ApiDoc),
        (path = "/api/orders", api = domain_orders::ApiDoc)
    )
)]
pub struct ApiDoc;
