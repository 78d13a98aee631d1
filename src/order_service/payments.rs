//! Payment session creation.

use crate::clients::PaymentGatewayClient;
use crate::model::{OrderView, PaymentSession, PaymentSessionRequest};
use crate::order_actor::OrderError;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Builds `create.payment.session` requests from hydrated orders and hands them to the gateway.
#[derive(Clone)]
pub struct PaymentOrchestrator {
    gateway: Arc<dyn PaymentGatewayClient>,
    currency: String,
}

impl PaymentOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGatewayClient>, currency: impl Into<String>) -> Self {
        Self {
            gateway,
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the gateway's session descriptor as received.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn create_payment_session(
        &self,
        order: &OrderView,
    ) -> Result<PaymentSession, OrderError> {
        let request = PaymentSessionRequest::for_order(order, self.currency.as_str());
        debug!(?request, "Sending create.payment.session");

        let session = self
            .gateway
            .send(request)
            .await
            .map_err(|e| OrderError::transport("payment gateway", e))?;
        info!("Payment session created");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Order, OrderDraft, OrderId, OrderItem, ProductId};
    use actor_runtime::mock::{self, MockService};
    use actor_runtime::FrameworkError;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::collections::HashMap;

    fn hydrated_order() -> OrderView {
        let draft = OrderDraft::from_items(vec![
            OrderItem {
                product_id: ProductId(1),
                quantity: 2,
                price: Decimal::from(10),
            },
            OrderItem {
                product_id: ProductId(2),
                quantity: 3,
                price: Decimal::from(5),
            },
        ])
        .unwrap();
        let names = HashMap::from([
            (ProductId(1), "Keyboard".to_string()),
            (ProductId(2), "Mouse".to_string()),
        ]);
        OrderView::new(Order::from_draft(OrderId::new(), draft, Utc::now()), &names)
    }

    #[tokio::test]
    async fn test_session_request_shape_and_passthrough() {
        let mock = MockService::<PaymentSessionRequest, PaymentSession>::new();
        let descriptor = json!({"url": "https://pay.example/s/1", "anything": [1, 2]});
        mock.expect().return_ok(PaymentSession(descriptor.clone()));

        let payments = PaymentOrchestrator::new(Arc::new(mock.client()), "usd");
        let order = hydrated_order();
        let session = payments.create_payment_session(&order).await.unwrap();
        assert_eq!(session.0, descriptor);

        let sent = mock.received();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            serde_json::to_value(&sent[0]).unwrap(),
            json!({
                "orderId": order.id,
                "currency": "usd",
                "items": [
                    {"name": "Keyboard", "price": 10.0, "quantity": 2},
                    {"name": "Mouse", "price": 5.0, "quantity": 3},
                ]
            })
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_gateway_failure_is_a_transport_failure() {
        let (client, mut receiver) = mock::create_mock_service::<PaymentSessionRequest, PaymentSession>(1);
        let payments = PaymentOrchestrator::new(Arc::new(client), "eur");
        let order = hydrated_order();

        let call = tokio::spawn(async move { payments.create_payment_session(&order).await });

        let (request, respond_to) = mock::expect_request(&mut receiver).await.unwrap();
        assert_eq!(request.currency, "eur");
        respond_to
            .send(Err(FrameworkError::ServiceFailure("card network down".into())))
            .unwrap();

        let err = call.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            OrderError::TransportFailure {
                service: "payment gateway",
                ..
            }
        ));
    }
}
