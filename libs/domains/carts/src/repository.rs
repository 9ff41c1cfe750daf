use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CartError, CartResult};
use crate::models::{Cart, CartStatus};

/// Repository trait for Cart persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Insert a new cart; a second pending cart for the same owner is rejected
    async fn create(&self, cart: Cart) -> CartResult<Cart>;

    async fn get_by_id(&self, id: Uuid) -> CartResult<Option<Cart>>;

    /// The owner's pending cart, if any
    async fn find_pending(&self, owner_id: Uuid) -> CartResult<Option<Cart>>;

    /// All carts of an owner, newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> CartResult<Vec<Cart>>;

    /// Replace a stored cart with `cart`
    async fn update(&self, cart: Cart) -> CartResult<Cart>;

    async fn delete(&self, id: Uuid) -> CartResult<bool>;
}

/// In-memory implementation of CartRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCartRepository {
    carts: Arc<RwLock<HashMap<Uuid, Cart>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn create(&self, cart: Cart) -> CartResult<Cart> {
        let mut carts = self.carts.write().await;

        let pending_exists = cart.is_pending()
            && carts
                .values()
                .any(|c| c.owner_id == cart.owner_id && c.is_pending());
        if pending_exists {
            return Err(CartError::PendingCartExists(cart.owner_id));
        }

        carts.insert(cart.id, cart.clone());
        tracing::info!(cart_id = %cart.id, owner_id = %cart.owner_id, "Created cart");
        Ok(cart)
    }

    async fn get_by_id(&self, id: Uuid) -> CartResult<Option<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts.get(&id).cloned())
    }

    async fn find_pending(&self, owner_id: Uuid) -> CartResult<Option<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts
            .values()
            .find(|c| c.owner_id == owner_id && c.status == CartStatus::Pending)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> CartResult<Vec<Cart>> {
        let carts = self.carts.read().await;
        let mut result: Vec<Cart> = carts
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update(&self, cart: Cart) -> CartResult<Cart> {
        let mut carts = self.carts.write().await;

        if !carts.contains_key(&cart.id) {
            return Err(CartError::NotFound(cart.id));
        }

        let pending_conflict = cart.is_pending()
            && carts
                .values()
                .any(|c| c.id != cart.id && c.owner_id == cart.owner_id && c.is_pending());
        if pending_conflict {
            return Err(CartError::PendingCartExists(cart.owner_id));
        }

        carts.insert(cart.id, cart.clone());
        tracing::info!(cart_id = %cart.id, status = %cart.status, "Updated cart");
        Ok(cart)
    }

    async fn delete(&self, id: Uuid) -> CartResult<bool> {
        let mut carts = self.carts.write().await;
        Ok(carts.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_pending_cart_is_rejected() {
        let repo = InMemoryCartRepository::new();
        let owner = Uuid::now_v7();

        repo.create(Cart::new(owner, vec![])).await.unwrap();
        let result = repo.create(Cart::new(owner, vec![])).await;
        assert!(matches!(result, Err(CartError::PendingCartExists(id)) if id == owner));

        // A different owner is unaffected
        assert!(repo.create(Cart::new(Uuid::now_v7(), vec![])).await.is_ok());
    }

    #[tokio::test]
    async fn test_reopening_conflicts_with_newer_pending_cart() {
        let repo = InMemoryCartRepository::new();
        let owner = Uuid::now_v7();

        let mut first = repo.create(Cart::new(owner, vec![])).await.unwrap();
        first.set_status(CartStatus::Confirmed);
        let mut first = repo.update(first).await.unwrap();

        repo.create(Cart::new(owner, vec![])).await.unwrap();

        first.set_status(CartStatus::Pending);
        assert!(matches!(
            repo.update(first).await,
            Err(CartError::PendingCartExists(_))
        ));
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let repo = InMemoryCartRepository::new();
        let owner = Uuid::now_v7();

        let mut older = Cart::new(owner, vec![]);
        older.status = CartStatus::Cancelled;
        older.created_at -= chrono::Duration::minutes(5);
        repo.create(older.clone()).await.unwrap();
        let newer = repo.create(Cart::new(owner, vec![])).await.unwrap();

        let carts = repo.list_by_owner(owner).await.unwrap();
        assert_eq!(carts.len(), 2);
        assert_eq!(carts[0].id, newer.id);
        assert_eq!(carts[1].id, older.id);
    }

    #[tokio::test]
    async fn test_update_missing_cart() {
        let repo = InMemoryCartRepository::new();
        let result = repo.update(Cart::new(Uuid::now_v7(), vec![])).await;
        assert!(matches!(result, Err(CartError::NotFound(_))));
    }
}
