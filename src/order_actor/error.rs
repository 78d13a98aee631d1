//! Error types for the order domain.

use crate::model::{OrderId, OrderStatus, ProductId};
use actor_runtime::FrameworkError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The catalog does not know these products.
    #[error("Unknown products: {}", join_ids(.0))]
    UnknownProducts(Vec<ProductId>),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// A payment with a different charge was already recorded for this order.
    #[error("Order {0} is already paid")]
    AlreadyPaid(OrderId),

    /// Rejected by the enforced transition policy.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// A request-reply call to a collaborator failed, was dropped or timed out.
    #[error("{service} unavailable: {reason}")]
    TransportFailure { service: &'static str, reason: String },

    /// Order creation did not complete; nothing was stored.
    #[error("Order creation failed: {0}")]
    CreationFailed(#[source] Box<OrderError>),

    /// An error occurred while communicating with the order store actor.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Coarse classification, the status a transport adapter would answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    NotFound,
    Conflict,
    Unavailable,
    Internal,
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::UnknownProducts(_) | OrderError::ValidationError(_) => {
                ErrorKind::InvalidRequest
            }
            OrderError::AlreadyPaid(_) | OrderError::InvalidTransition { .. } => ErrorKind::Conflict,
            OrderError::TransportFailure { .. } => ErrorKind::Unavailable,
            OrderError::CreationFailed(cause) => cause.kind(),
            OrderError::ActorCommunicationError(_) => ErrorKind::Internal,
        }
    }

    /// Client-side faults: bad input or products the catalog does not know.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.root_cause(),
            OrderError::ValidationError(_) | OrderError::UnknownProducts(_)
        )
    }

    /// The innermost error, looking through `CreationFailed`.
    pub fn root_cause(&self) -> &OrderError {
        match self {
            OrderError::CreationFailed(cause) => cause.root_cause(),
            other => other,
        }
    }

    /// Wraps a failed call to the collaborator named `service`.
    pub fn transport(service: &'static str, e: FrameworkError) -> Self {
        OrderError::TransportFailure {
            service,
            reason: e.to_string(),
        }
    }
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ProductId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
