//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the order authority.
//!
//! ## Wiring
//!
//! The order store actor has no dependencies of its own. It is created first, then started
//! with the configured [`TransitionPolicy`](crate::config::TransitionPolicy) as its context:
//!
//! ```rust,ignore
//! let (order_actor, store) = order_actor::new(config.store_buffer);
//! let store_handle = tokio::spawn(order_actor.run(config.transition_policy));
//!
//! let orders = OrderLifecycle::new(store, catalog);
//! let (listener, events) = PaymentEventListener::new(config.event_buffer, orders.clone());
//! let listener_handle = tokio::spawn(listener.run());
//! ```
//!
//! The catalog and the gateway are request-reply collaborators behind trait objects, so the
//! same wiring serves a broker bridge, an in-process endpoint or a test double.
//!
//! ## Graceful Shutdown
//!
//! 1. **Close the event channel**: the listener drains queued events and exits
//! 2. **Drop the lifecycle**: the listener's clone is already gone, so the store channel closes
//! 3. **Await the store**: the actor logs its final size and exits
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the subscriber; see the [`tracing`](self::tracing) module.

pub mod order_system;
pub mod payment_events;
pub mod tracing;

pub use self::order_system::*;
pub use self::payment_events::*;
pub use self::tracing::setup_tracing;
