//! Product prices as a cart [`PriceCatalog`]

use async_trait::async_trait;
use domain_carts::{CartError, CartResult, PriceCatalog};
use uuid::Uuid;

use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Looks up unit prices in the product repository
pub struct ProductPriceCatalog<R: ProductRepository> {
    service: ProductService<R>,
}

impl<R: ProductRepository> ProductPriceCatalog<R> {
    pub fn new(service: ProductService<R>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<R: ProductRepository> PriceCatalog for ProductPriceCatalog<R> {
    async fn unit_price(&self, product_id: Uuid) -> CartResult<Option<i64>> {
        match self.service.get_product(product_id).await {
            Ok(product) => Ok(Some(product.price)),
            Err(crate::error::ProductError::NotFound(_)) => Ok(None),
            Err(e) => Err(CartError::Database(e.to_string())),
        }
    }
}
