//! # Runtime Errors
//!
//! Failures produced by the plumbing itself: closed channels, dropped replies, missing
//! entities, timeouts, and errors raised by entity hooks or remote handlers.

use std::time::Duration;

/// Errors that can occur within the actor runtime.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Service failure: {0}")]
    ServiceFailure(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}
