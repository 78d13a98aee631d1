//! Messages exchanged with the payment gateway.

use crate::model::{OrderId, OrderView};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `create.payment.session` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    pub order_id: OrderId,
    pub currency: String,
    pub items: Vec<PaymentSessionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

impl PaymentSessionRequest {
    pub fn for_order(order: &OrderView, currency: impl Into<String>) -> Self {
        Self {
            order_id: order.id,
            currency: currency.into(),
            items: order
                .items
                .iter()
                .map(|item| PaymentSessionItem {
                    name: item.name.clone(),
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Whatever the gateway returns for a session. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentSession(pub serde_json::Value);

/// Inbound `payment.succeeded` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    pub order_id: OrderId,
    pub stripe_payment_id: String,
    pub receipt_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let id = OrderId::new();
        let raw = format!(
            r#"{{"orderId":"{id}","stripePaymentId":"ch_1","receiptUrl":"https://pay.example/r/1"}}"#
        );
        let event: PaymentSucceeded = serde_json::from_str(&raw).unwrap();
        assert_eq!(event.order_id, id);
        assert_eq!(event.stripe_payment_id, "ch_1");
    }
}
