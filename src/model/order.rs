/// A purchase order and the shapes it is read through.
///
/// # Actor Framework
/// [`Order`] implements the [`ActorEntity`](actor_runtime::ActorEntity) trait and is owned by a
/// [`ResourceActor`](actor_runtime::ResourceActor). See
/// [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for:
/// - Creation parameters ([`OrderDraft`])
/// - Update parameters ([`OrderStatus`])
/// - Custom actions ([`OrderAction`](crate::order_actor::OrderAction))
///
/// # Derived data
/// `total_amount` and `total_items` are always computed from the items; item names are never
/// stored and are looked up in the catalog whenever an [`OrderView`] is built.
use crate::model::ProductId;
use crate::order_actor::OrderError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// Type-safe identifier for Orders. Version 7 UUIDs sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// The hardened transition table: a pending order may be paid or cancelled, and
    /// re-applying the current status is always allowed.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Pending, Paid) | (Pending, Cancelled) | (Pending, Pending) | (Paid, Paid) | (Cancelled, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted line item. `price` is the catalog price at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    /// `price × quantity`, or `None` when the product leaves the `Decimal` range.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: Uuid,
    pub receipt_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub total_amount: Decimal,
    pub total_items: u64,
    pub status: OrderStatus,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub external_charge_id: Option<String>,
    pub receipt: Option<Receipt>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// A new pending order holding the draft's items.
    pub fn from_draft(id: OrderId, draft: OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            total_amount: draft.total_amount,
            total_items: draft.total_items,
            status: OrderStatus::Pending,
            paid: false,
            paid_at: None,
            external_charge_id: None,
            receipt: None,
            items: draft.items,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn product_ids(&self) -> Vec<ProductId> {
        distinct_product_ids(self.items.iter().map(|item| item.product_id))
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            id: self.id,
            total_amount: self.total_amount,
            total_items: self.total_items,
            status: self.status,
            paid: self.paid,
            paid_at: self.paid_at,
            external_charge_id: self.external_charge_id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Sums `price × quantity` and `quantity` over `items`.
pub fn order_totals(items: &[OrderItem]) -> Result<(Decimal, u64), OrderError> {
    items
        .iter()
        .try_fold((Decimal::ZERO, 0u64), |(amount, count), item| {
            let amount = item
                .subtotal()
                .and_then(|subtotal| amount.checked_add(subtotal))
                .ok_or_else(|| {
                    OrderError::ValidationError(format!(
                        "order total overflows at product {}",
                        item.product_id
                    ))
                })?;
            Ok((amount, count + u64::from(item.quantity)))
        })
}

/// An order needs at least one line and every quantity must be positive.
pub fn validate_lines(
    lines: impl IntoIterator<Item = (ProductId, u32)>,
) -> Result<(), OrderError> {
    let mut empty = true;
    for (product_id, quantity) in lines {
        empty = false;
        if quantity == 0 {
            return Err(OrderError::ValidationError(format!(
                "quantity for product {product_id} must be positive"
            )));
        }
    }
    if empty {
        return Err(OrderError::ValidationError(
            "order must contain at least one item".into(),
        ));
    }
    Ok(())
}

/// Distinct ids in first-seen order.
pub fn distinct_product_ids(ids: impl IntoIterator<Item = ProductId>) -> Vec<ProductId> {
    let mut distinct = Vec::new();
    for id in ids {
        if !distinct.contains(&id) {
            distinct.push(id);
        }
    }
    distinct
}

/// Payload for creating a new order: priced items plus their derived totals.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub total_amount: Decimal,
    pub total_items: u64,
    pub items: Vec<OrderItem>,
}

impl OrderDraft {
    pub fn from_items(items: Vec<OrderItem>) -> Result<Self, OrderError> {
        let (total_amount, total_items) = order_totals(&items)?;
        Ok(Self {
            total_amount,
            total_items,
            items,
        })
    }
}

/// What a caller asks for: product ids and quantities, never prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl OrderItemRequest {
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// An order with item names filled in from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub total_amount: Decimal,
    pub total_items: u64,
    pub status: OrderStatus,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub external_charge_id: Option<String>,
    pub receipt: Option<Receipt>,
    pub items: Vec<OrderItemView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderView {
    /// Items whose product is missing from `names` get an empty name.
    pub fn new(order: Order, names: &HashMap<ProductId, String>) -> Self {
        let items = order
            .items
            .into_iter()
            .map(|item| OrderItemView {
                name: names.get(&item.product_id).cloned().unwrap_or_default(),
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        Self {
            id: order.id,
            total_amount: order.total_amount,
            total_items: order.total_items,
            status: order.status,
            paid: order.paid,
            paid_at: order.paid_at,
            external_charge_id: order.external_charge_id,
            receipt: order.receipt,
            items,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }

    /// Names currently shown on the items, keyed by product.
    pub fn names(&self) -> HashMap<ProductId, String> {
        self.items
            .iter()
            .map(|item| (item.product_id, item.name.clone()))
            .collect()
    }
}

/// A listing row: the order without its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub total_amount: Decimal,
    pub total_items: u64,
    pub status: OrderStatus,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub external_charge_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
