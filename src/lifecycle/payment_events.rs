//! Inbound `payment.succeeded` events.
//!
//! The gateway publishes an event after each successful charge. A broker bridge (or a test)
//! pushes them into the sender returned by [`PaymentEventListener::new`]; the listener applies
//! them one by one through [`OrderLifecycle::mark_paid`]. There is no retry and no delivery
//! guarantee beyond the channel; a replayed event for the same charge is harmless.

use crate::model::PaymentSucceeded;
use crate::order_service::OrderLifecycle;
use tokio::sync::mpsc;
use tracing::{error, info};

pub struct PaymentEventListener {
    receiver: mpsc::Receiver<PaymentSucceeded>,
    lifecycle: OrderLifecycle,
}

impl PaymentEventListener {
    pub fn new(buffer_size: usize, lifecycle: OrderLifecycle) -> (Self, mpsc::Sender<PaymentSucceeded>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver, lifecycle }, sender)
    }

    /// Applies events until every sender has been dropped.
    pub async fn run(mut self) {
        info!("Payment event listener started");
        let (mut applied, mut failed) = (0usize, 0usize);

        while let Some(event) = self.receiver.recv().await {
            match self
                .lifecycle
                .mark_paid(event.order_id, &event.stripe_payment_id, &event.receipt_url)
                .await
            {
                Ok(order) => {
                    applied += 1;
                    info!(order_id = %order.id, charge_id = %event.stripe_payment_id, "Payment event applied");
                }
                Err(e) => {
                    failed += 1;
                    error!(order_id = %event.order_id, charge_id = %event.stripe_payment_id, error = %e, "Payment event rejected");
                }
            }
        }

        info!(applied, failed, "Payment event listener shutdown");
    }
}
