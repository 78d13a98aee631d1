//! # Order Lifecycle
//!
//! Entry points for everything that happens to an order after the transport layer has decoded
//! the request: creation, lookup, listing, status changes and payment completion.
//!
//! Item names are never stored. Every read asks the catalog for the current names, so a renamed
//! product shows its new name on old orders while the price stays the one paid.

use crate::clients::{OrderStore, ProductCatalogClient};
use crate::model::{
    Order, OrderId, OrderItemRequest, OrderPagination, OrderStatus, OrderSummary, OrderView, Page,
};
use crate::order_actor::OrderError;
use crate::order_service::OrderAggregator;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct OrderLifecycle {
    store: OrderStore,
    catalog: Arc<dyn ProductCatalogClient>,
    aggregator: OrderAggregator,
}

impl OrderLifecycle {
    pub fn new(store: OrderStore, catalog: Arc<dyn ProductCatalogClient>) -> Self {
        Self {
            aggregator: OrderAggregator::new(catalog.clone()),
            store,
            catalog,
        }
    }

    /// Validates and prices the items, stores the order, and returns it with item names.
    ///
    /// Every failure comes back as [`OrderError::CreationFailed`] around the root cause.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn create(&self, items: Vec<OrderItemRequest>) -> Result<OrderView, OrderError> {
        let result: Result<OrderView, OrderError> = async {
            let draft = self.aggregator.build(&items).await?;
            let order = self.store.create(draft).await?;
            self.hydrate(order).await
        }
        .await;

        match result {
            Ok(view) => {
                info!(order_id = %view.id, total_amount = %view.total_amount, "Order created");
                Ok(view)
            }
            Err(e) => {
                warn!(error = %e, "Order creation failed");
                Err(OrderError::CreationFailed(Box::new(e)))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: OrderId) -> Result<OrderView, OrderError> {
        let order = self.store.get_by_id(id).await?;
        self.hydrate(order).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, pagination: OrderPagination) -> Result<Page<OrderSummary>, OrderError> {
        pagination.validate()?;
        self.store.list(&pagination).await
    }

    /// Moves the order to `status`. Asking for the status it already has writes nothing.
    #[instrument(skip(self))]
    pub async fn change_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderView, OrderError> {
        let current = self.find_one(id).await?;
        if current.status == status {
            debug!("Status unchanged");
            return Ok(current);
        }

        let updated = self.store.update_status(id, status).await?;
        info!(from = %current.status, to = %status, "Status changed");
        Ok(OrderView::new(updated, &current.names()))
    }

    /// Records a completed payment: status PAID, charge id and receipt.
    #[instrument(skip(self, receipt_url))]
    pub async fn mark_paid(
        &self,
        id: OrderId,
        charge_id: &str,
        receipt_url: &str,
    ) -> Result<Order, OrderError> {
        let order = self
            .store
            .record_payment(id, charge_id.to_string(), receipt_url.to_string())
            .await?;
        info!(paid_at = ?order.paid_at, "Order paid");
        Ok(order)
    }

    async fn hydrate(&self, order: Order) -> Result<OrderView, OrderError> {
        let products = self.catalog.resolve(&order.product_ids()).await?;
        let names = products
            .into_iter()
            .map(|(id, product)| (id, product.name))
            .collect();
        Ok(OrderView::new(order, &names))
    }
}
