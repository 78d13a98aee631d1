use crate::clients::{
    CatalogServiceClient, GatewayServiceClient, PaymentGatewayClient, ProductCatalogClient,
};
use crate::config::OrderConfig;
use crate::lifecycle::PaymentEventListener;
use crate::model::{OrderItemRequest, OrderView, PaymentSession, PaymentSucceeded};
use crate::order_actor::{self, OrderError};
use crate::order_service::{OrderLifecycle, PaymentOrchestrator};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// The runtime orchestrator for the order authority.
///
/// `OrderSystem` owns:
/// - **The order store actor**, the only holder of order state
/// - **The payment event listener**, which applies `payment.succeeded` events
/// - **The public entry points**: [`OrderLifecycle`] and [`PaymentOrchestrator`]
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::connect(&config, catalog_client, gateway_client);
///
/// let (order, session) = system.place_order(items).await?;
/// system.payment_events().send(event).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Order operations
    pub orders: OrderLifecycle,

    /// Payment session creation
    pub payments: PaymentOrchestrator,

    events: mpsc::Sender<PaymentSucceeded>,
    store_handle: tokio::task::JoinHandle<()>,
    listener_handle: tokio::task::JoinHandle<()>,
}

impl OrderSystem {
    /// Starts the store actor and the event listener around the given collaborators.
    pub fn new(
        config: &OrderConfig,
        catalog: Arc<dyn ProductCatalogClient>,
        gateway: Arc<dyn PaymentGatewayClient>,
    ) -> Self {
        // 1. Create the store actor (no dependencies)
        let (order_actor, store) = order_actor::new(config.store_buffer);

        // 2. Start it with the transition policy as its context
        let store_handle = tokio::spawn(order_actor.run(config.transition_policy));

        // 3. Wire the services and the listener on top
        let orders = OrderLifecycle::new(store, catalog);
        let payments = PaymentOrchestrator::new(gateway, config.payment_currency.clone());
        let (listener, events) = PaymentEventListener::new(config.event_buffer, orders.clone());
        let listener_handle = tokio::spawn(listener.run());

        info!(
            policy = ?config.transition_policy,
            currency = %config.payment_currency,
            "Order system started"
        );

        Self {
            orders,
            payments,
            events,
            store_handle,
            listener_handle,
        }
    }

    /// Like [`OrderSystem::new`], with the configured timeout applied to both channel clients.
    pub fn connect(
        config: &OrderConfig,
        catalog: CatalogServiceClient,
        gateway: GatewayServiceClient,
    ) -> Self {
        Self::new(
            config,
            Arc::new(catalog.with_timeout(config.request_timeout)),
            Arc::new(gateway.with_timeout(config.request_timeout)),
        )
    }

    /// Where inbound `payment.succeeded` events go.
    pub fn payment_events(&self) -> mpsc::Sender<PaymentSucceeded> {
        self.events.clone()
    }

    /// Creates the order and opens its payment session right away.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn place_order(
        &self,
        items: Vec<OrderItemRequest>,
    ) -> Result<(OrderView, PaymentSession), OrderError> {
        let order = self.orders.create(items).await?;
        let session = self.payments.create_payment_session(&order).await?;
        Ok((order, session))
    }

    /// Gracefully shuts down the system.
    ///
    /// The event channel closes first so the listener can drain what is queued; the store
    /// stops once the last lifecycle handle is gone. Clones of [`OrderSystem::orders`] held
    /// elsewhere keep the store alive, so drop them before calling this.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down order system...");

        // Step 1: stop accepting events and let the listener finish
        drop(self.events);
        if let Err(e) = self.listener_handle.await {
            error!("Listener task failed: {:?}", e);
            return Err(format!("Listener task failed: {:?}", e));
        }

        // Step 2: release the last store client and wait for the actor
        drop(self.orders);
        drop(self.payments);
        if let Err(e) = self.store_handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }

        info!("Order system shutdown complete.");
        Ok(())
    }
}
