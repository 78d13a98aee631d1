//! # Order Store
//!
//! High-level API over the `Order` actor. It wraps a `ResourceClient<Order>`, turns runtime
//! errors back into [`OrderError`]s and shapes listings into pages.
use crate::model::{Order, OrderDraft, OrderId, OrderPagination, OrderStatus, OrderSummary, Page, PageMeta};
use crate::order_actor::{OrderAction, OrderError};
use actor_runtime::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for the order store actor.
#[derive(Clone)]
pub struct OrderStore {
    inner: ResourceClient<Order>,
}

impl OrderStore {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Persists the draft as a new pending order, items included, in one step.
    #[instrument(skip(self, draft), fields(total_items = draft.total_items))]
    pub async fn create(&self, draft: OrderDraft) -> Result<Order, OrderError> {
        debug!("Sending create");
        let order = self.inner.create(draft).await.map_err(Self::map_error)?;
        info!(order_id = %order.id, total_amount = %order.total_amount, "Order stored");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id).await?.ok_or(OrderError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        debug!("Sending update");
        self.inner
            .update(id, status)
            .await
            .map_err(|e| Self::map_id_error(id, e))
    }

    /// Marks the order paid and creates its receipt.
    #[instrument(skip(self, receipt_url))]
    pub async fn record_payment(
        &self,
        id: OrderId,
        charge_id: String,
        receipt_url: String,
    ) -> Result<Order, OrderError> {
        debug!("Sending record payment");
        self.inner
            .perform_action(
                id,
                OrderAction::RecordPayment {
                    charge_id,
                    receipt_url,
                },
            )
            .await
            .map_err(|e| Self::map_id_error(id, e))
    }

    /// One page of summaries, in creation order. `page` is 1-based.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &OrderPagination) -> Result<Page<OrderSummary>, OrderError> {
        let listing = self
            .inner
            .list(query.filter(), query.offset(), query.limit as usize)
            .await
            .map_err(Self::map_error)?;

        debug!(total = listing.total, returned = listing.items.len(), "Listed");
        Ok(Page {
            data: listing.items.iter().map(Order::summary).collect(),
            meta: PageMeta::new(listing.total, query.page, query.limit),
        })
    }

    fn map_id_error(id: OrderId, e: FrameworkError) -> OrderError {
        match e {
            FrameworkError::NotFound(_) => OrderError::NotFound(id),
            other => Self::map_error(other),
        }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderStore {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::EntityError(inner) => match inner.downcast::<OrderError>() {
                Ok(order_error) => *order_error,
                Err(other) => OrderError::ActorCommunicationError(other.to_string()),
            },
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
