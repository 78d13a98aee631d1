//! # Order Authority demo
//!
//! Runs the order system against an in-process catalog and payment gateway:
//! 1.  Loads [`OrderConfig`] from the environment (and `.env`, if present).
//! 2.  Starts the demo collaborators and the [`OrderSystem`].
//! 3.  Places an order, lists orders, and feeds a `payment.succeeded` event back in.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use actor_runtime::{FrameworkError, ServiceEndpoint, ServiceHandler};
use async_trait::async_trait;
use order_authority::clients::{CatalogReply, ValidateProducts};
use order_authority::config::OrderConfig;
use order_authority::lifecycle::{setup_tracing, OrderSystem};
use order_authority::model::{
    CatalogProduct, OrderItemRequest, OrderPagination, PaymentSession, PaymentSessionRequest,
    PaymentSucceeded, ProductId,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use tracing::{error, info, Instrument};

/// A fixed product list standing in for the catalog service.
struct DemoCatalog {
    products: HashMap<ProductId, CatalogProduct>,
}

#[async_trait]
impl ServiceHandler for DemoCatalog {
    type Request = ValidateProducts;
    type Reply = CatalogReply;

    async fn handle(&mut self, request: ValidateProducts) -> Result<CatalogReply, FrameworkError> {
        let unknown: Vec<ProductId> = request
            .product_ids
            .iter()
            .filter(|id| !self.products.contains_key(*id))
            .copied()
            .collect();
        if !unknown.is_empty() {
            return Ok(CatalogReply::UnknownProducts(unknown));
        }
        Ok(CatalogReply::Products(
            request
                .product_ids
                .iter()
                .filter_map(|id| self.products.get(id).cloned())
                .collect(),
        ))
    }
}

/// Hands out fake checkout URLs standing in for the payment gateway.
struct DemoGateway {
    sessions: u32,
}

#[async_trait]
impl ServiceHandler for DemoGateway {
    type Request = PaymentSessionRequest;
    type Reply = PaymentSession;

    async fn handle(&mut self, request: PaymentSessionRequest) -> Result<PaymentSession, FrameworkError> {
        self.sessions += 1;
        let amount: Decimal = request
            .items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        Ok(PaymentSession(json!({
            "id": format!("cs_demo_{}", self.sessions),
            "url": format!("https://checkout.example/pay/{}", request.order_id),
            "amount": amount.to_string(),
            "currency": request.currency,
        })))
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = OrderConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting order authority demo");

    let catalog = DemoCatalog {
        products: [
            CatalogProduct::new(1, "Mechanical keyboard", Decimal::new(8999, 2)),
            CatalogProduct::new(2, "Wireless mouse", Decimal::new(2450, 2)),
            CatalogProduct::new(3, "USB-C cable", Decimal::new(799, 2)),
        ]
        .into_iter()
        .map(|product| (product.id, product))
        .collect(),
    };
    let (catalog_endpoint, catalog_client) = ServiceEndpoint::<DemoCatalog>::new(16);
    let (gateway_endpoint, gateway_client) = ServiceEndpoint::<DemoGateway>::new(16);
    let catalog_handle = tokio::spawn(catalog_endpoint.run(catalog));
    let gateway_handle = tokio::spawn(gateway_endpoint.run(DemoGateway { sessions: 0 }));

    let system = OrderSystem::connect(&config, catalog_client, gateway_client);

    let span = tracing::info_span!("place_order");
    let placed = async {
        info!("Placing order");
        system
            .place_order(vec![OrderItemRequest::new(1, 1), OrderItemRequest::new(3, 2)])
            .await
    }
    .instrument(span)
    .await;

    match placed {
        Ok((order, session)) => {
            info!(
                order_id = %order.id,
                total_amount = %order.total_amount,
                currency = system.payments.currency(),
                session = %session.0,
                "Order placed"
            );

            let event = PaymentSucceeded {
                order_id: order.id,
                stripe_payment_id: "ch_demo_1".to_string(),
                receipt_url: format!("https://checkout.example/receipts/{}", order.id),
            };
            system
                .payment_events()
                .send(event)
                .await
                .map_err(|e| e.to_string())?;
        }
        Err(e) => error!(error = %e, "Order placement failed"),
    }

    let rejected = system.orders.create(vec![OrderItemRequest::new(42, 1)]).await;
    if let Err(e) = rejected {
        info!(error = %e, kind = ?e.kind(), "Unknown product rejected as expected");
    }

    let page = system
        .orders
        .list(OrderPagination::default())
        .await
        .map_err(|e| e.to_string())?;
    info!(total = page.meta.total, last_page = page.meta.last_page, "Orders listed");

    system.shutdown().await?;
    catalog_handle.await.map_err(|e| e.to_string())?;
    gateway_handle.await.map_err(|e| e.to_string())?;

    info!("Demo completed successfully");
    Ok(())
}
