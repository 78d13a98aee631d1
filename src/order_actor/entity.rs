//! Entity trait implementation for the Order domain type.
//!
//! The store actor calls these hooks on a staged copy of the order and commits the copy only
//! when the hook succeeds, so every status change and payment is applied whole or not at all.

use crate::config::TransitionPolicy;
use crate::model::{order_totals, validate_lines, Order, OrderDraft, OrderFilter, OrderId, OrderStatus, Receipt};
use crate::order_actor::{OrderAction, OrderError};
use actor_runtime::ActorEntity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderDraft;
    type Update = OrderStatus;
    type Action = OrderAction;
    type ActionResult = Order;
    type Filter = OrderFilter;
    type Context = TransitionPolicy;
    type Error = OrderError;

    fn from_create_params(id: OrderId, draft: OrderDraft) -> Result<Self, Self::Error> {
        Ok(Order::from_draft(id, draft, Utc::now()))
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.status.map_or(true, |status| self.status == status)
    }

    /// Rejects drafts with no items, a zero quantity, or totals that don't add up.
    async fn on_create(&mut self, _policy: &TransitionPolicy) -> Result<(), Self::Error> {
        validate_lines(self.items.iter().map(|item| (item.product_id, item.quantity)))?;
        let (total_amount, total_items) = order_totals(&self.items)?;
        if total_amount != self.total_amount || total_items != self.total_items {
            warn!(
                order_id = %self.id,
                expected_amount = %total_amount,
                draft_amount = %self.total_amount,
                "Draft totals do not match items"
            );
            return Err(OrderError::ValidationError(
                "order totals do not match its items".into(),
            ));
        }
        Ok(())
    }

    async fn on_update(
        &mut self,
        status: OrderStatus,
        policy: &TransitionPolicy,
    ) -> Result<(), Self::Error> {
        if !policy.allows(self.status, status) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: status,
            });
        }
        debug!(order_id = %self.id, from = %self.status, to = %status, "Status change");
        self.apply_status(status, Utc::now());
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        policy: &TransitionPolicy,
    ) -> Result<Order, Self::Error> {
        match action {
            OrderAction::RecordPayment {
                charge_id,
                receipt_url,
            } => {
                // A charge kept from before a cancellation doesn't make the order paid.
                if let (OrderStatus::Paid, Some(existing)) =
                    (self.status, &self.external_charge_id)
                {
                    if *existing == charge_id {
                        info!(order_id = %self.id, %charge_id, "Payment already recorded");
                        return Ok(self.clone());
                    }
                    return Err(OrderError::AlreadyPaid(self.id));
                }
                if charge_id.trim().is_empty() {
                    return Err(OrderError::ValidationError("charge id is empty".into()));
                }
                if !policy.allows(self.status, OrderStatus::Paid) {
                    return Err(OrderError::InvalidTransition {
                        from: self.status,
                        to: OrderStatus::Paid,
                    });
                }

                let now = Utc::now();
                self.apply_status(OrderStatus::Paid, now);
                self.external_charge_id = Some(charge_id);
                self.receipt = Some(Receipt {
                    id: Uuid::now_v7(),
                    receipt_url,
                    created_at: now,
                });
                Ok(self.clone())
            }
        }
    }
}

impl Order {
    /// Sets `status` and keeps `paid` / `paid_at` in step with it.
    fn apply_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        if status == OrderStatus::Paid {
            self.paid = true;
            self.paid_at.get_or_insert(now);
        } else {
            self.paid = false;
            self.paid_at = None;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderItem, ProductId};
    use rust_decimal::Decimal;

    fn pending_order() -> Order {
        let draft = OrderDraft::from_items(vec![OrderItem {
            product_id: ProductId(1),
            quantity: 2,
            price: Decimal::from(10),
        }])
        .unwrap();
        Order::from_draft(OrderId::new(), draft, Utc::now())
    }

    fn record(charge_id: &str) -> OrderAction {
        OrderAction::RecordPayment {
            charge_id: charge_id.to_string(),
            receipt_url: format!("https://pay.example/receipts/{charge_id}"),
        }
    }

    #[tokio::test]
    async fn test_tampered_totals_are_rejected() {
        let mut order = pending_order();
        order.total_amount = Decimal::from(1);
        let err = order.on_create(&TransitionPolicy::Unchecked).await.unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)));

        let mut empty = pending_order();
        empty.items.clear();
        empty.total_amount = Decimal::ZERO;
        empty.total_items = 0;
        assert!(empty.on_create(&TransitionPolicy::Unchecked).await.is_err());
    }

    #[tokio::test]
    async fn test_status_keeps_paid_fields_consistent() {
        let mut order = pending_order();
        let policy = TransitionPolicy::Unchecked;

        order.on_update(OrderStatus::Paid, &policy).await.unwrap();
        assert!(order.paid);
        assert!(order.paid_at.is_some());

        order.on_update(OrderStatus::Cancelled, &policy).await.unwrap();
        assert!(!order.paid);
        assert!(order.paid_at.is_none());

        // Unchecked policy lets a cancelled order come back.
        order.on_update(OrderStatus::Pending, &policy).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_enforced_policy_rejects_leaving_a_final_status() {
        let mut order = pending_order();
        let policy = TransitionPolicy::Enforced;
        order.on_update(OrderStatus::Cancelled, &policy).await.unwrap();

        let err = order.on_update(OrderStatus::Pending, &policy).await.unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Cancelled,
                to: OrderStatus::Pending
            }
        );
        let err = order.handle_action(record("ch_1"), &policy).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_record_payment_and_replays() {
        let mut order = pending_order();
        let policy = TransitionPolicy::Unchecked;

        let paid = order.handle_action(record("ch_1"), &policy).await.unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);
        assert!(paid.paid && paid.paid_at.is_some());
        assert_eq!(paid.external_charge_id.as_deref(), Some("ch_1"));
        let receipt = paid.receipt.clone().unwrap();

        // Same charge: nothing changes, no second receipt.
        let replay = order.handle_action(record("ch_1"), &policy).await.unwrap();
        assert_eq!(replay.receipt.unwrap().id, receipt.id);
        assert_eq!(replay.updated_at, paid.updated_at);

        // Different charge: rejected.
        let err = order.handle_action(record("ch_2"), &policy).await.unwrap_err();
        assert_eq!(err, OrderError::AlreadyPaid(order.id));
    }

    #[tokio::test]
    async fn test_payment_after_cancellation_is_recorded_again() {
        let mut order = pending_order();
        let policy = TransitionPolicy::Unchecked;

        let first = order.handle_action(record("ch_1"), &policy).await.unwrap();
        order.on_update(OrderStatus::Cancelled, &policy).await.unwrap();
        assert_eq!(order.external_charge_id.as_deref(), Some("ch_1"));

        let replay = order.handle_action(record("ch_1"), &policy).await.unwrap();
        assert_eq!(replay.status, OrderStatus::Paid);
        assert!(replay.paid && replay.paid_at.is_some());
        assert_ne!(replay.receipt.unwrap().id, first.receipt.unwrap().id);

        order.on_update(OrderStatus::Cancelled, &policy).await.unwrap();
        let repaid = order.handle_action(record("ch_2"), &policy).await.unwrap();
        assert_eq!(repaid.status, OrderStatus::Paid);
        assert_eq!(repaid.external_charge_id.as_deref(), Some("ch_2"));
    }

    #[tokio::test]
    async fn test_first_charge_on_a_manually_paid_order_is_recorded() {
        let mut order = pending_order();
        let policy = TransitionPolicy::Unchecked;
        order.on_update(OrderStatus::Paid, &policy).await.unwrap();
        let paid_at = order.paid_at;

        let paid = order.handle_action(record("ch_1"), &policy).await.unwrap();
        assert_eq!(paid.external_charge_id.as_deref(), Some("ch_1"));
        assert!(paid.receipt.is_some());
        assert_eq!(paid.paid_at, paid_at);
    }

    #[test]
    fn test_filter_by_status() {
        let order = pending_order();
        assert!(order.matches(&OrderFilter::default()));
        assert!(order.matches(&OrderFilter {
            status: Some(OrderStatus::Pending)
        }));
        assert!(!order.matches(&OrderFilter {
            status: Some(OrderStatus::Paid)
        }));
    }
}
