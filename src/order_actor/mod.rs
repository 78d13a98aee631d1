//! Order-specific resource logic and entity implementation.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::OrderStore;
use crate::model::{Order, OrderId};
use actor_runtime::ResourceActor;

/// Custom operations on a stored order.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Marks the order paid by `charge_id` and attaches its receipt.
    RecordPayment {
        charge_id: String,
        receipt_url: String,
    },
}

/// Creates a new Order actor and its store client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderStore) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, OrderId::new);
    (actor, OrderStore::new(generic_client))
}
