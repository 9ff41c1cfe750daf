use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Cart lifecycle status
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
pub enum CartStatus {
    /// Open cart, still editable; at most one per user
    #[default]
    #[serde(rename = "Pendiente")]
    #[strum(serialize = "Pendiente")]
    Pending,
    /// An order was placed from this cart
    #[serde(rename = "Confirmado")]
    #[strum(serialize = "Confirmado")]
    Confirmed,
    #[serde(rename = "Cancelado")]
    #[strum(serialize = "Cancelado")]
    Cancelled,
}

/// One product line inside a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct LineItem {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: u32,
    /// Line subtotal in cents
    #[validate(range(min = 0))]
    pub subtotal: i64,
}

/// Cart entity - stored in the `carts` collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    /// Sum of line subtotals, in cents
    pub total: i64,
    pub status: CartStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// New pending cart for `owner_id`
    pub fn new(owner_id: Uuid, line_items: Vec<LineItem>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner_id,
            total: compute_total(&line_items),
            line_items,
            status: CartStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == CartStatus::Pending
    }

    /// Replace every line and recompute the total from scratch
    pub fn replace_line_items(&mut self, line_items: Vec<LineItem>) {
        self.total = compute_total(&line_items);
        self.line_items = line_items;
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: CartStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Cart total as a pure function of its lines.
///
/// Saturates at `i64::MAX`; the service rejects such carts through
/// [`checked_total`] before they are built.
pub fn compute_total(line_items: &[LineItem]) -> i64 {
    line_items
        .iter()
        .fold(0i64, |total, item| total.saturating_add(item.subtotal))
}

/// Sum of subtotals, `None` when it does not fit in an `i64`
pub fn checked_total(line_items: &[LineItem]) -> Option<i64> {
    line_items
        .iter()
        .try_fold(0i64, |total, item| total.checked_add(item.subtotal))
}

/// DTO for creating a cart
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCart {
    /// Owner of the cart; defaults to the authenticated user
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    #[validate(nested)]
    pub line_items: Vec<LineItem>,
}

/// DTO for replacing the lines of a pending cart
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCart {
    #[validate(nested)]
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub message: String,
    pub cart: Cart,
}

impl CartResponse {
    pub fn new(message: impl Into<String>, cart: Cart) -> Self {
        Self {
            message: message.into(),
            cart,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartsResponse {
    pub message: String,
    pub carts: Vec<Cart>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
