//! # Order Authority
//!
//! The order side of a system built from independent services: a product catalog, a payment
//! gateway and this crate, talking over asynchronous request-reply messaging.
//!
//! The catalog is the only source of truth for prices. Callers send product ids and quantities;
//! the order authority asks the catalog for prices, computes the totals, and stores the order
//! with its items in one step.
//!
//! ## Core Components
//!
//! - **[model]**: Orders, items, receipts, read views and the wire shapes of the collaborators.
//! - **[order_actor]**: [`Order`](model::Order) as an [`ActorEntity`](actor_runtime::ActorEntity):
//!   status rules, payment recording, and the [`OrderError`](order_actor::OrderError) enum.
//! - **[clients]**: [`OrderStore`](clients::OrderStore) over the store actor, and the
//!   [`ProductCatalogClient`](clients::ProductCatalogClient) /
//!   [`PaymentGatewayClient`](clients::PaymentGatewayClient) collaborator traits.
//! - **[order_service]**: [`OrderAggregator`](order_service::OrderAggregator),
//!   [`OrderLifecycle`](order_service::OrderLifecycle) and
//!   [`PaymentOrchestrator`](order_service::PaymentOrchestrator).
//! - **[lifecycle]**: [`OrderSystem`](lifecycle::OrderSystem) wiring, the payment event
//!   listener and tracing setup.
//! - **[config]**: [`OrderConfig`](config::OrderConfig) from `ORDERS_*` environment variables.
//!
//! ## Testing
//!
//! See [`actor_runtime::mock`] for mocks of the store actor and of request-reply collaborators.

pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod order_service;
