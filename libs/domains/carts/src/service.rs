//! Cart Service - the cart engine

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CartError, CartResult};
use crate::models::{checked_total, Cart, CartStatus, LineItem};
use crate::repository::CartRepository;

/// How line subtotals are established
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PricingMode {
    /// Subtotals supplied by the client are stored as given
    #[default]
    Trusted,
    /// Subtotals are recomputed as unit price × quantity from a [`PriceCatalog`]
    Catalog,
}

/// Source of unit prices (in cents) for catalog pricing
#[async_trait]
pub trait PriceCatalog: Send + Sync {
    /// `None` when the product does not exist
    async fn unit_price(&self, product_id: Uuid) -> CartResult<Option<i64>>;
}

/// Cart service enforcing the one-pending-cart rule and cart totals.
pub struct CartService<R: CartRepository> {
    repository: Arc<R>,
    catalog: Option<Arc<dyn PriceCatalog>>,
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            catalog: None,
        }
    }

    /// Switch to [`PricingMode::Catalog`] backed by `catalog`
    pub fn with_catalog(mut self, catalog: Arc<dyn PriceCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn pricing_mode(&self) -> PricingMode {
        if self.catalog.is_some() {
            PricingMode::Catalog
        } else {
            PricingMode::Trusted
        }
    }

    /// Open a new pending cart for `owner_id`
    #[instrument(skip(self, line_items), fields(lines = line_items.len()))]
    pub async fn create_cart(&self, owner_id: Uuid, line_items: Vec<LineItem>) -> CartResult<Cart> {
        let line_items = self.price_line_items(line_items).await?;

        if self.repository.find_pending(owner_id).await?.is_some() {
            return Err(CartError::PendingCartExists(owner_id));
        }

        let cart = self.repository.create(Cart::new(owner_id, line_items)).await?;
        tracing::info!(cart_id = %cart.id, owner_id = %owner_id, total = cart.total, "Cart created");
        Ok(cart)
    }

    /// Replace every line of the owner's pending cart
    #[instrument(skip(self, line_items), fields(lines = line_items.len()))]
    pub async fn replace_line_items(
        &self,
        owner_id: Uuid,
        line_items: Vec<LineItem>,
    ) -> CartResult<Cart> {
        let line_items = self.price_line_items(line_items).await?;
        let mut cart = self.get_pending_cart(owner_id).await?;

        cart.replace_line_items(line_items);
        self.repository.update(cart).await
    }

    #[instrument(skip(self))]
    pub async fn confirm(&self, owner_id: Uuid) -> CartResult<Cart> {
        self.close_pending(owner_id, CartStatus::Confirmed).await
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, owner_id: Uuid) -> CartResult<Cart> {
        self.close_pending(owner_id, CartStatus::Cancelled).await
    }

    #[instrument(skip(self))]
    pub async fn get_pending_cart(&self, owner_id: Uuid) -> CartResult<Cart> {
        self.repository
            .find_pending(owner_id)
            .await?
            .ok_or(CartError::NoPendingCart(owner_id))
    }

    #[instrument(skip(self))]
    pub async fn list_carts(&self, owner_id: Uuid) -> CartResult<Vec<Cart>> {
        self.repository.list_by_owner(owner_id).await
    }

    /// Delete the owner's pending cart
    #[instrument(skip(self))]
    pub async fn delete_cart(&self, owner_id: Uuid) -> CartResult<()> {
        let cart = self.get_pending_cart(owner_id).await?;

        if !self.repository.delete(cart.id).await? {
            return Err(CartError::NotFound(cart.id));
        }

        tracing::info!(cart_id = %cart.id, owner_id = %owner_id, "Cart deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_cart(&self, cart_id: Uuid) -> CartResult<Cart> {
        self.repository
            .get_by_id(cart_id)
            .await?
            .ok_or(CartError::NotFound(cart_id))
    }

    /// Set the status of a cart by id, regardless of its current status
    #[instrument(skip(self))]
    pub async fn set_status(&self, cart_id: Uuid, status: CartStatus) -> CartResult<Cart> {
        let mut cart = self.get_cart(cart_id).await?;
        cart.set_status(status);

        let cart = self.repository.update(cart).await?;
        tracing::info!(cart_id = %cart_id, status = %status, "Cart status changed");
        Ok(cart)
    }

    async fn close_pending(&self, owner_id: Uuid, status: CartStatus) -> CartResult<Cart> {
        let mut cart = self.get_pending_cart(owner_id).await?;
        cart.set_status(status);

        let cart = self.repository.update(cart).await?;
        tracing::info!(cart_id = %cart.id, status = %status, "Cart closed");
        Ok(cart)
    }

    async fn price_line_items(&self, mut line_items: Vec<LineItem>) -> CartResult<Vec<LineItem>> {
        for item in &line_items {
            item.validate()
                .map_err(|e| CartError::Validation(e.to_string()))?;
        }

        if let Some(catalog) = &self.catalog {
            for item in &mut line_items {
                let unit_price = catalog
                    .unit_price(item.product_id)
                    .await?
                    .ok_or(CartError::UnknownProduct(item.product_id))?;
                item.subtotal = unit_price
                    .checked_mul(i64::from(item.quantity))
                    .ok_or(CartError::TotalOverflow)?;
            }
        }

        checked_total(&line_items).ok_or(CartError::TotalOverflow)?;
        Ok(line_items)
    }
}

impl<R: CartRepository> Clone for CartService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            catalog: self.catalog.clone(),
        }
    }
}
