use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{OrderError, OrderResult};

/// Order lifecycle state
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
pub enum OrderState {
    #[default]
    #[serde(rename = "Pendiente")]
    #[strum(serialize = "Pendiente")]
    Pending,
    #[serde(rename = "Confirmado")]
    #[strum(serialize = "Confirmado")]
    Confirmed,
    #[serde(rename = "Procesando")]
    #[strum(serialize = "Procesando")]
    Processing,
    #[serde(rename = "Enviado")]
    #[strum(serialize = "Enviado")]
    Shipped,
    #[serde(rename = "Entregado")]
    #[strum(serialize = "Entregado")]
    Delivered,
    #[serde(rename = "Cancelado")]
    #[strum(serialize = "Cancelado")]
    Cancelled,
    #[serde(rename = "Pago Fallido")]
    #[strum(serialize = "Pago Fallido")]
    PaymentFailed,
}

impl OrderState {
    pub const ALL: [OrderState; 7] = [
        OrderState::Pending,
        OrderState::Confirmed,
        OrderState::Processing,
        OrderState::Shipped,
        OrderState::Delivered,
        OrderState::Cancelled,
        OrderState::PaymentFailed,
    ];

    /// Delivered and cancelled orders never change again
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderState::Delivered | OrderState::Cancelled)
    }

    pub fn can_cancel(self) -> bool {
        !self.is_terminal()
    }

    /// States that count towards revenue
    pub fn is_revenue(self) -> bool {
        matches!(self, OrderState::Confirmed | OrderState::Delivered)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Preparing,
    Shipped,
    InTransit,
    Delivered,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
pub enum PaymentMethod {
    #[serde(rename = "Efectivo")]
    #[strum(serialize = "Efectivo")]
    Cash,
    #[serde(rename = "Tarjeta")]
    #[strum(serialize = "Tarjeta")]
    Card,
}

/// Delivery address snapshot stored on the order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub address_name: String,
}

/// Address as submitted by the client; only street and city are mandatory
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddressInput {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(alias = "zip")]
    pub zip_code: Option<String>,
    pub country: Option<String>,
    #[serde(alias = "name")]
    pub address_name: Option<String>,
}

impl AddressInput {
    pub fn into_address(self) -> OrderResult<OrderAddress> {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let (Some(street), Some(city)) = (non_blank(self.street), non_blank(self.city)) else {
            return Err(OrderError::Validation(
                "Complete address is required".to_string(),
            ));
        };

        Ok(OrderAddress {
            street,
            city,
            state: self.state.unwrap_or_default(),
            zip_code: self.zip_code.unwrap_or_default(),
            country: non_blank(self.country).unwrap_or_else(|| "USA".to_string()),
            address_name: non_blank(self.address_name).unwrap_or_else(|| "Default".to_string()),
        })
    }
}

/// Order entity - stored in the `orders` collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub cart_id: Uuid,
    /// Owner of the source cart at placement time
    pub owner_id: Uuid,
    pub address: OrderAddress,
    pub payment_method: PaymentMethod,
    pub delivery_method: String,
    /// Amounts in cents
    pub delivery_cost: i64,
    pub discount: i64,
    pub final_total: i64,
    pub payment_id: Option<String>,
    pub promo_code: Option<String>,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub delivery_status: DeliveryStatus,
    pub state: OrderState,
    pub tracking_number: Option<String>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub transaction_details: Option<serde_json::Value>,
    pub cancel_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub payment_confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated placement data, produced by the service from [`PlaceOrder`]
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub cart_id: Uuid,
    pub owner_id: Uuid,
    pub address: OrderAddress,
    pub payment_method: PaymentMethod,
    pub delivery_method: String,
    pub delivery_cost: i64,
    pub discount: i64,
    pub final_total: i64,
    pub payment_id: Option<String>,
    pub promo_code: Option<String>,
    pub payment_status: PaymentStatus,
}

impl Order {
    pub fn new(input: NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            cart_id: input.cart_id,
            owner_id: input.owner_id,
            address: input.address,
            payment_method: input.payment_method,
            delivery_method: input.delivery_method,
            delivery_cost: input.delivery_cost,
            discount: input.discount,
            final_total: input.final_total,
            payment_id: input.payment_id,
            promo_code: input.promo_code,
            payment_status: input.payment_status,
            delivery_status: DeliveryStatus::Pending,
            state: OrderState::Pending,
            tracking_number: None,
            delivery_date: None,
            notes: None,
            transaction_details: None,
            cancel_reason: None,
            cancelled_at: None,
            payment_confirmed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the provided fields; absent fields are left untouched
    pub fn apply_update(&mut self, update: UpdateOrder) {
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(payment_status) = update.payment_status {
            self.payment_status = payment_status;
        }
        if let Some(delivery_status) = update.delivery_status {
            self.delivery_status = delivery_status;
        }
        if let Some(tracking_number) = update.tracking_number {
            self.tracking_number = Some(tracking_number);
        }
        if let Some(delivery_date) = update.delivery_date {
            self.delivery_date = Some(delivery_date);
        }
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        self.updated_at = Utc::now();
    }
}

/// DTO for placing an order from a pending cart
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PlaceOrder {
    pub cart_id: Uuid,
    pub address: Option<AddressInput>,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_method: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub delivery_cost: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub discount: i64,
    /// Defaults to the cart total when omitted or zero
    pub final_total: Option<i64>,
    pub payment_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub promo_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ConfirmPayment {
    pub payment_id: Option<String>,
    /// Defaults to `completed`
    pub payment_status: Option<PaymentStatus>,
    #[schema(value_type = Option<Object>)]
    pub transaction_details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CancelOrder {
    #[validate(length(max = 300))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrder {
    pub state: Option<OrderState>,
    pub payment_status: Option<PaymentStatus>,
    pub delivery_status: Option<DeliveryStatus>,
    #[validate(length(max = 100))]
    pub tracking_number: Option<String>,
    pub delivery_date: Option<DateTime<Utc>>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Count and amount of orders in one state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StateStats {
    pub state: OrderState,
    pub count: u64,
    pub total_amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderStats {
    /// Only states with at least one order appear
    pub stats: Vec<StateStats>,
    pub total_orders: u64,
    /// Sum of final totals over confirmed and delivered orders
    pub total_revenue: i64,
}

impl OrderStats {
    /// Aggregate from per-state rows
    pub fn from_state_stats(mut stats: Vec<StateStats>) -> Self {
        stats.sort_by_key(|s| OrderState::ALL.iter().position(|state| *state == s.state));

        let total_orders = stats.iter().map(|s| s.count).sum();
        let total_revenue = stats
            .iter()
            .filter(|s| s.state.is_revenue())
            .fold(0i64, |sum, s| sum.saturating_add(s.total_amount));

        Self {
            stats,
            total_orders,
            total_revenue,
        }
    }

    pub fn from_orders(orders: &[Order]) -> Self {
        let stats = OrderState::ALL
            .iter()
            .filter_map(|state| {
                let in_state: Vec<&Order> = orders.iter().filter(|o| o.state == *state).collect();
                (!in_state.is_empty()).then(|| StateStats {
                    state: *state,
                    count: in_state.len() as u64,
                    total_amount: in_state
                        .iter()
                        .fold(0i64, |sum, o| sum.saturating_add(o.final_total)),
                })
            })
            .collect();

        Self::from_state_stats(stats)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub message: String,
    pub order: Order,
}

impl OrderResponse {
    pub fn new(message: impl Into<String>, order: Order) -> Self {
        Self {
            message: message.into(),
            order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub message: String,
    pub data: Vec<Order>,
}

impl OrderListResponse {
    pub fn new(data: Vec<Order>) -> Self {
        let message = if data.is_empty() {
            "No orders found"
        } else {
            "Orders retrieved successfully"
        };
        Self {
            message: message.to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderStatsResponse {
    pub message: String,
    pub data: OrderStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
