//! Order Service - the order engine
//!
//! Orders are placed from pending carts. Placing flips the cart to confirmed;
//! cancelling reopens it. The two documents are written separately: if the
//! cart write fails after the order was stored, the order is deleted again.

use axum_helpers::AuthUser;
use chrono::Utc;
use domain_carts::{CartError, CartRepository, CartService, CartStatus};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    CancelOrder, ConfirmPayment, NewOrder, Order, OrderState, OrderStats, PaymentStatus,
    PlaceOrder, UpdateOrder,
};
use crate::repository::OrderRepository;
use crate::transitions::TransitionPolicy;

pub const DEFAULT_CANCEL_REASON: &str = "Cancelled by user";
const DEFAULT_DELIVERY_METHOD: &str = "standard";

pub struct OrderService<O: OrderRepository, C: CartRepository> {
    orders: Arc<O>,
    carts: CartService<C>,
    policy: TransitionPolicy,
}

impl<O: OrderRepository, C: CartRepository> OrderService<O, C> {
    pub fn new(orders: O, carts: CartService<C>) -> Self {
        Self {
            orders: Arc::new(orders),
            carts,
            policy: TransitionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Place an order from a pending cart and confirm the cart
    #[instrument(skip(self, input), fields(actor = %actor.id, cart_id = %input.cart_id))]
    pub async fn place_order(&self, actor: &AuthUser, input: PlaceOrder) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let address = input
            .address
            .ok_or_else(|| OrderError::Validation("Complete address is required".to_string()))?
            .into_address()?;
        let payment_method = input
            .payment_method
            .ok_or_else(|| OrderError::Validation("Payment method is required".to_string()))?;

        let cart = self.carts.get_cart(input.cart_id).await?;
        Self::ensure_access(actor, cart.owner_id)?;
        if !cart.is_pending() {
            return Err(OrderError::CartNotPending(cart.id));
        }

        let final_total = match input.final_total {
            Some(total) if total != 0 => total,
            _ => cart.total,
        };
        if final_total <= 0 {
            return Err(OrderError::Validation(
                "Final total must be greater than zero".to_string(),
            ));
        }

        let order = Order::new(NewOrder {
            cart_id: cart.id,
            owner_id: cart.owner_id,
            address,
            payment_method,
            delivery_method: input
                .delivery_method
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DELIVERY_METHOD.to_string()),
            delivery_cost: input.delivery_cost,
            discount: input.discount,
            final_total,
            payment_id: input.payment_id,
            promo_code: input.promo_code,
            payment_status: input.payment_status.unwrap_or_default(),
        });
        let order = self.orders.create(order).await?;

        if let Err(err) = self.carts.set_status(cart.id, CartStatus::Confirmed).await {
            tracing::error!(
                order_id = %order.id,
                cart_id = %cart.id,
                error = %err,
                "Failed to confirm cart, removing order"
            );
            if let Err(delete_err) = self.orders.delete(order.id).await {
                tracing::error!(order_id = %order.id, error = %delete_err, "Compensating delete failed");
            }
            return Err(OrderError::Internal(format!(
                "Failed to confirm cart {}: {}",
                cart.id, err
            )));
        }

        tracing::info!(order_id = %order.id, final_total = order.final_total, "Order placed");
        Ok(order)
    }

    /// Record a payment outcome. Repeating the same call converges to the same state.
    #[instrument(skip(self, input), fields(actor = %actor.id))]
    pub async fn confirm_payment(
        &self,
        actor: &AuthUser,
        id: Uuid,
        input: ConfirmPayment,
    ) -> OrderResult<Order> {
        let mut order = self.get_order(actor, id).await?;
        let payment_status = input.payment_status.unwrap_or(PaymentStatus::Completed);

        let target_state = match payment_status {
            PaymentStatus::Completed => Some(OrderState::Confirmed),
            PaymentStatus::Failed => Some(OrderState::PaymentFailed),
            _ => None,
        };
        if let Some(state) = target_state {
            self.policy.check(order.state, state)?;
            order.state = state;
        }

        let unchanged = order.payment_status == payment_status && order.payment_confirmed_at.is_some();
        if !unchanged {
            order.payment_confirmed_at = Some(Utc::now());
        }
        order.payment_status = payment_status;
        if input.payment_id.is_some() {
            order.payment_id = input.payment_id;
        }
        if input.transaction_details.is_some() {
            order.transaction_details = input.transaction_details;
        }
        order.updated_at = Utc::now();

        let order = self.orders.update(order).await?;
        tracing::info!(order_id = %id, payment_status = %payment_status, state = %order.state, "Payment recorded");
        Ok(order)
    }

    /// Cancel an order and reopen its cart
    #[instrument(skip(self, input), fields(actor = %actor.id))]
    pub async fn cancel(&self, actor: &AuthUser, id: Uuid, input: CancelOrder) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let mut order = self.get_order(actor, id).await?;

        if !order.state.can_cancel() {
            return Err(OrderError::NotCancellable(order.state));
        }

        Self::mark_cancelled(&mut order, input.reason);
        let order = self.orders.update(order).await?;

        self.reopen_cart(order.cart_id).await?;

        tracing::info!(order_id = %id, "Order cancelled");
        Ok(order)
    }

    /// Merge status fields, validated against the transition policy
    #[instrument(skip(self, input), fields(actor = %actor.id))]
    pub async fn update_status(
        &self,
        actor: &AuthUser,
        id: Uuid,
        input: UpdateOrder,
    ) -> OrderResult<Order> {
        input
            .validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let mut order = self.get_order(actor, id).await?;
        if let Some(state) = input.state {
            self.policy.check(order.state, state)?;
        }

        // Cancelling here carries the same bookkeeping as `cancel`
        let cancelling =
            input.state == Some(OrderState::Cancelled) && order.state != OrderState::Cancelled;
        if cancelling && !order.state.can_cancel() {
            return Err(OrderError::NotCancellable(order.state));
        }

        order.apply_update(input);
        if cancelling {
            Self::mark_cancelled(&mut order, None);
        }
        let order = self.orders.update(order).await?;

        if cancelling {
            self.reopen_cart(order.cart_id).await?;
            tracing::info!(order_id = %id, "Order cancelled through status update");
        }
        Ok(order)
    }

    #[instrument(skip(self), fields(actor = %actor.id))]
    pub async fn get_order(&self, actor: &AuthUser, id: Uuid) -> OrderResult<Order> {
        let order = self
            .orders
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        Self::ensure_access(actor, order.owner_id)?;
        Ok(order)
    }

    #[instrument(skip(self), fields(actor = %actor.id))]
    pub async fn list_orders_for_user(
        &self,
        actor: &AuthUser,
        user_id: Uuid,
    ) -> OrderResult<Vec<Order>> {
        Self::ensure_access(actor, user_id)?;
        self.orders.list_by_owner(user_id).await
    }

    #[instrument(skip(self), fields(actor = %actor.id))]
    pub async fn list_orders(&self, actor: &AuthUser) -> OrderResult<Vec<Order>> {
        Self::ensure_admin(actor)?;
        self.orders.list().await
    }

    #[instrument(skip(self), fields(actor = %actor.id))]
    pub async fn delete_order(&self, actor: &AuthUser, id: Uuid) -> OrderResult<()> {
        Self::ensure_admin(actor)?;

        if !self.orders.delete(id).await? {
            return Err(OrderError::NotFound(id));
        }

        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(actor = %actor.id))]
    pub async fn stats(&self, actor: &AuthUser) -> OrderResult<OrderStats> {
        Self::ensure_admin(actor)?;
        self.orders.stats().await
    }

    fn mark_cancelled(order: &mut Order, reason: Option<String>) {
        let now = Utc::now();
        order.state = OrderState::Cancelled;
        order.cancel_reason = Some(
            reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string()),
        );
        order.cancelled_at = Some(now);
        order.updated_at = now;
    }

        async fn reopen_cart(&self, cart_id: Uuid) -> OrderResult<()> {
        let cart = match self.carts.get_cart(cart_id).await {
            Ok(cart) => cart,
            Err(CartError::NotFound(_)) => {
                tracing::warn!(cart_id = %cart_id, "Source cart no longer exists");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        if cart.status != CartStatus::Confirmed {
            return Ok(());
        }

        match self.carts.set_status(cart_id, CartStatus::Pending).await {
            Ok(_) => Ok(()),
            Err(CartError::PendingCartExists(owner_id)) => {
                tracing::warn!(
                    cart_id = %cart_id,
                    owner_id = %owner_id,
                    "Owner already has a pending cart, source cart stays confirmed"
                );
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn ensure_access(actor: &AuthUser, owner_id: Uuid) -> OrderResult<()> {
        if actor.can_access(owner_id) {
            Ok(())
        } else {
            Err(OrderError::Forbidden(
                "Not authorized to access this order".to_string(),
            ))
        }
    }

    fn ensure_admin(actor: &AuthUser) -> OrderResult<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(OrderError::Forbidden("Administrator role required".to_string()))
        }
    }
}

impl<O: OrderRepository, C: CartRepository> Clone for OrderService<O, C> {
    fn clone(&self) -> Self {
        Self {
            orders: Arc::clone(&self.orders),
            carts: self.carts.clone(),
            policy: self.policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressInput, DeliveryStatus, PaymentMethod};
    use crate::repository::{InMemoryOrderRepository, MockOrderRepository};
    use async_trait::async_trait;
    use axum_helpers::Role;
    use domain_carts::{Cart, CartResult, InMemoryCartRepository, LineItem};

    type Service = OrderService<InMemoryOrderRepository, InMemoryCartRepository>;

    fn setup() -> (Service, CartService<InMemoryCartRepository>) {
        let carts = CartService::new(InMemoryCartRepository::new());
        let service = OrderService::new(InMemoryOrderRepository::new(), carts.clone());
        (service, carts)
    }

    fn lines(subtotals: &[i64]) -> Vec<LineItem> {
        subtotals
            .iter()
            .map(|s| LineItem {
                product_id: Uuid::now_v7(),
                quantity: 1,
                subtotal: *s,
            })
            .collect()
    }

    fn place(cart_id: Uuid) -> PlaceOrder {
        PlaceOrder {
            cart_id,
            address: Some(AddressInput {
                street: Some("1 Main St".to_string()),
                city: Some("Springfield".to_string()),
                ..Default::default()
            }),
            payment_method: Some(PaymentMethod::Card),
            delivery_method: None,
            delivery_cost: 0,
            discount: 0,
            final_total: None,
            payment_id: None,
            payment_status: None,
            promo_code: None,
        }
    }

    fn customer() -> AuthUser {
        AuthUser::new(Uuid::now_v7(), Role::Customer)
    }

    #[tokio::test]
    async fn test_order_lifecycle_example() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10, 25])).await.unwrap();
        assert_eq!(cart.total, 35);

        let order = service.place_order(&user, place(cart.id)).await.unwrap();
        assert_eq!(order.final_total, 35);
        assert_eq!(order.state, OrderState::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.delivery_method, "standard");
        assert_eq!(order.owner_id, user.id);
        assert_eq!(
            carts.get_cart(cart.id).await.unwrap().status,
            CartStatus::Confirmed
        );

        let paid = service
            .confirm_payment(
                &user,
                order.id,
                ConfirmPayment {
                    payment_id: Some("pay_1".to_string()),
                    payment_status: Some(PaymentStatus::Completed),
                    transaction_details: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(paid.state, OrderState::Confirmed);
        assert!(paid.payment_confirmed_at.is_some());

        let cancelled = service
            .cancel(&user, order.id, CancelOrder::default())
            .await
            .unwrap();
        assert_eq!(cancelled.state, OrderState::Cancelled);
        assert_eq!(cancelled.cancel_reason.as_deref(), Some(DEFAULT_CANCEL_REASON));
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(
            carts.get_cart(cart.id).await.unwrap().status,
            CartStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_place_order_on_confirmed_cart_conflicts() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();

        service.place_order(&user, place(cart.id)).await.unwrap();
        let second = service.place_order(&user, place(cart.id)).await;

        assert!(matches!(second, Err(OrderError::CartNotPending(_))));
    }

    #[tokio::test]
    async fn test_place_order_validation() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();

        let mut no_address = place(cart.id);
        no_address.address = None;
        assert!(matches!(
            service.place_order(&user, no_address).await,
            Err(OrderError::Validation(_))
        ));

        let mut no_payment = place(cart.id);
        no_payment.payment_method = None;
        assert!(matches!(
            service.place_order(&user, no_payment).await,
            Err(OrderError::Validation(_))
        ));

        // Nothing was placed, the cart is still open
        assert!(carts.get_cart(cart.id).await.unwrap().is_pending());
    }

    #[tokio::test]
    async fn test_place_order_on_empty_cart_needs_positive_total() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, vec![]).await.unwrap();

        let result = service.place_order(&user, place(cart.id)).await;
        assert!(matches!(result, Err(OrderError::Validation(_))));

        let mut explicit = place(cart.id);
        explicit.final_total = Some(500);
        let order = service.place_order(&user, explicit).await.unwrap();
        assert_eq!(order.final_total, 500);
    }

    #[tokio::test]
    async fn test_place_order_unknown_cart() {
        let (service, _) = setup();
        let result = service.place_order(&customer(), place(Uuid::now_v7())).await;
        assert!(matches!(result, Err(OrderError::CartNotFound(_))));
    }

    #[tokio::test]
    async fn test_place_order_for_foreign_cart_is_forbidden() {
        let (service, carts) = setup();
        let cart = carts.create_cart(Uuid::now_v7(), lines(&[10])).await.unwrap();

        let result = service.place_order(&customer(), place(cart.id)).await;
        assert!(matches!(result, Err(OrderError::Forbidden(_))));

        let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);
        assert!(service.place_order(&admin, place(cart.id)).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_terminal_order_conflicts_and_keeps_state() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();
        let order = service.place_order(&user, place(cart.id)).await.unwrap();

        service
            .update_status(
                &user,
                order.id,
                UpdateOrder {
                    state: Some(OrderState::Delivered),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = service.cancel(&user, order.id, CancelOrder::default()).await;
        assert!(matches!(
            result,
            Err(OrderError::NotCancellable(OrderState::Delivered))
        ));
        assert_eq!(
            service.get_order(&user, order.id).await.unwrap().state,
            OrderState::Delivered
        );
        assert_eq!(
            carts.get_cart(cart.id).await.unwrap().status,
            CartStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn test_status_update_to_cancelled_matches_cancel() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();
        let order = service.place_order(&user, place(cart.id)).await.unwrap();

        let cancelled = service
            .update_status(
                &user,
                order.id,
                UpdateOrder {
                    state: Some(OrderState::Cancelled),
                    notes: Some("customer called".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(cancelled.state, OrderState::Cancelled);
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(cancelled.cancel_reason.as_deref(), Some(DEFAULT_CANCEL_REASON));
        assert_eq!(cancelled.notes.as_deref(), Some("customer called"));
        assert_eq!(
            carts.get_cart(cart.id).await.unwrap().status,
            CartStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_status_update_cannot_cancel_delivered_order() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();
        let order = service.place_order(&user, place(cart.id)).await.unwrap();
        let to = |state: OrderState| UpdateOrder {
            state: Some(state),
            ..Default::default()
        };

        service
            .update_status(&user, order.id, to(OrderState::Delivered))
            .await
            .unwrap();
        let result = service
            .update_status(&user, order.id, to(OrderState::Cancelled))
            .await;

        assert!(matches!(
            result,
            Err(OrderError::NotCancellable(OrderState::Delivered))
        ));
        let stored = service.get_order(&user, order.id).await.unwrap();
        assert_eq!(stored.state, OrderState::Delivered);
        assert!(stored.cancelled_at.is_none());
    }

    #[tokio::test]
    async fn test_cancel_twice_conflicts() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();
        let order = service.place_order(&user, place(cart.id)).await.unwrap();

        let reason = CancelOrder {
            reason: Some("Changed my mind".to_string()),
        };
        let cancelled = service.cancel(&user, order.id, reason).await.unwrap();
        assert_eq!(cancelled.cancel_reason.as_deref(), Some("Changed my mind"));

        assert!(matches!(
            service.cancel(&user, order.id, CancelOrder::default()).await,
            Err(OrderError::NotCancellable(OrderState::Cancelled))
        ));
    }

    #[tokio::test]
    async fn test_cancel_keeps_cart_confirmed_when_owner_has_new_pending_cart() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();
        let order = service.place_order(&user, place(cart.id)).await.unwrap();
        let newer = carts.create_cart(user.id, lines(&[5])).await.unwrap();

        let cancelled = service
            .cancel(&user, order.id, CancelOrder::default())
            .await
            .unwrap();

        assert_eq!(cancelled.state, OrderState::Cancelled);
        assert_eq!(carts.get_pending_cart(user.id).await.unwrap().id, newer.id);
        assert_eq!(
            carts.get_cart(cart.id).await.unwrap().status,
            CartStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn test_confirm_payment_is_idempotent() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();
        let order = service.place_order(&user, place(cart.id)).await.unwrap();

        let input = ConfirmPayment {
            payment_id: Some("pay_1".to_string()),
            payment_status: None,
            transaction_details: Some(serde_json::json!({ "gateway": "test" })),
        };
        let first = service
            .confirm_payment(&user, order.id, input.clone())
            .await
            .unwrap();
        let second = service
            .confirm_payment(&user, order.id, input)
            .await
            .unwrap();

        assert_eq!(first.payment_status, PaymentStatus::Completed);
        assert_eq!(second.state, first.state);
        assert_eq!(second.payment_status, first.payment_status);
        assert_eq!(second.payment_confirmed_at, first.payment_confirmed_at);
        assert_eq!(second.payment_id.as_deref(), Some("pay_1"));
    }

    #[tokio::test]
    async fn test_failed_payment_sets_payment_failed() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();
        let order = service.place_order(&user, place(cart.id)).await.unwrap();

        let failed = service
            .confirm_payment(
                &user,
                order.id,
                ConfirmPayment {
                    payment_status: Some(PaymentStatus::Failed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(failed.state, OrderState::PaymentFailed);

        let processing = service
            .confirm_payment(
                &user,
                order.id,
                ConfirmPayment {
                    payment_status: Some(PaymentStatus::Processing),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(processing.state, OrderState::PaymentFailed);
        assert_eq!(processing.payment_status, PaymentStatus::Processing);
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_skipping_states() {
        let carts = CartService::new(InMemoryCartRepository::new());
        let service = OrderService::new(InMemoryOrderRepository::new(), carts.clone())
            .with_policy(TransitionPolicy::Strict);
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();
        let order = service.place_order(&user, place(cart.id)).await.unwrap();

        let skip = service
            .update_status(
                &user,
                order.id,
                UpdateOrder {
                    state: Some(OrderState::Delivered),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(skip, Err(OrderError::InvalidTransition { .. })));

        let updated = service
            .update_status(
                &user,
                order.id,
                UpdateOrder {
                    state: Some(OrderState::Processing),
                    delivery_status: Some(DeliveryStatus::Preparing),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.state, OrderState::Processing);
        assert_eq!(updated.delivery_status, DeliveryStatus::Preparing);
    }

    #[tokio::test]
    async fn test_order_access_rules() {
        let (service, carts) = setup();
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();
        let order = service.place_order(&user, place(cart.id)).await.unwrap();

        let other = customer();
        assert!(matches!(
            service.get_order(&other, order.id).await,
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            service.list_orders_for_user(&other, user.id).await,
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            service.list_orders(&user).await,
            Err(OrderError::Forbidden(_))
        ));
        assert!(matches!(
            service.stats(&user).await,
            Err(OrderError::Forbidden(_))
        ));

        let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);
        assert_eq!(service.list_orders(&admin).await.unwrap().len(), 1);
        assert_eq!(
            service.list_orders_for_user(&user, user.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_stats_revenue() {
        let (service, carts) = setup();
        let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);

        for (subtotal, paid) in [(100, true), (40, false)] {
            let owner = customer();
            let cart = carts.create_cart(owner.id, lines(&[subtotal])).await.unwrap();
            let order = service.place_order(&owner, place(cart.id)).await.unwrap();
            if paid {
                service
                    .confirm_payment(&owner, order.id, ConfirmPayment::default())
                    .await
                    .unwrap();
            }
        }

        let stats = service.stats(&admin).await.unwrap();
        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.total_revenue, 100);
    }

    #[tokio::test]
    async fn test_delete_order_requires_existing_order() {
        let mut mock_orders = MockOrderRepository::new();
        let id = Uuid::now_v7();
        mock_orders
            .expect_delete()
            .with(mockall::predicate::eq(id))
            .returning(|_| Ok(false));

        let service = OrderService::new(mock_orders, CartService::new(InMemoryCartRepository::new()));
        let admin = AuthUser::new(Uuid::now_v7(), Role::Admin);

        assert!(matches!(
            service.delete_order(&admin, id).await,
            Err(OrderError::NotFound(_))
        ));
    }

    /// Cart store whose writes always fail, for the compensation path
    struct ReadOnlyCarts(InMemoryCartRepository);

    #[async_trait]
    impl CartRepository for ReadOnlyCarts {
        async fn create(&self, cart: Cart) -> CartResult<Cart> {
            self.0.create(cart).await
        }
        async fn get_by_id(&self, id: Uuid) -> CartResult<Option<Cart>> {
            self.0.get_by_id(id).await
        }
        async fn find_pending(&self, owner_id: Uuid) -> CartResult<Option<Cart>> {
            self.0.find_pending(owner_id).await
        }
        async fn list_by_owner(&self, owner_id: Uuid) -> CartResult<Vec<Cart>> {
            self.0.list_by_owner(owner_id).await
        }
        async fn update(&self, _cart: Cart) -> CartResult<Cart> {
            Err(CartError::Database("write refused".to_string()))
        }
        async fn delete(&self, id: Uuid) -> CartResult<bool> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_failed_cart_flip_removes_order() {
        let carts = CartService::new(ReadOnlyCarts(InMemoryCartRepository::new()));
        let orders = InMemoryOrderRepository::new();
        let service = OrderService::new(orders.clone(), carts.clone());
        let user = customer();
        let cart = carts.create_cart(user.id, lines(&[10])).await.unwrap();

        let result = service.place_order(&user, place(cart.id)).await;

        assert!(matches!(result, Err(OrderError::Internal(_))));
        assert!(orders.list().await.unwrap().is_empty());
        assert!(carts.get_cart(cart.id).await.unwrap().is_pending());
    }
}
