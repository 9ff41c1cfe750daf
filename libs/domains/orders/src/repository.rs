use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{Order, OrderStats};

/// Repository trait for Order persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: Order) -> OrderResult<Order>;

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>>;

    /// Every order, newest first
    async fn list(&self) -> OrderResult<Vec<Order>>;

    /// Orders placed from carts owned by `owner_id`, newest first
    async fn list_by_owner(&self, owner_id: Uuid) -> OrderResult<Vec<Order>>;

    async fn update(&self, order: Order) -> OrderResult<Order>;

    async fn delete(&self, id: Uuid) -> OrderResult<bool>;

    /// Per-state counts and amounts plus revenue
    async fn stats(&self) -> OrderResult<OrderStats>;
}

/// In-memory implementation of OrderRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: Order) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        tracing::info!(order_id = %order.id, cart_id = %order.cart_id, "Created order");
        Ok(order)
    }

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn list(&self) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(Self::newest_first(orders.values().cloned().collect()))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(Self::newest_first(
            orders
                .values()
                .filter(|o| o.owner_id == owner_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update(&self, order: Order) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;

        if !orders.contains_key(&order.id) {
            return Err(OrderError::NotFound(order.id));
        }

        orders.insert(order.id, order.clone());
        tracing::info!(order_id = %order.id, state = %order.state, "Updated order");
        Ok(order)
    }

    async fn delete(&self, id: Uuid) -> OrderResult<bool> {
        let mut orders = self.orders.write().await;
        Ok(orders.remove(&id).is_some())
    }

    async fn stats(&self) -> OrderResult<OrderStats> {
        let orders = self.orders.read().await;
        let all: Vec<Order> = orders.values().cloned().collect();
        Ok(OrderStats::from_orders(&all))
    }
}
