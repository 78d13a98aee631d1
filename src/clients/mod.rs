//! Type-safe clients: the order store wrapper around
//! [`ResourceClient`](actor_runtime::ResourceClient), and the request-reply collaborators.

pub mod catalog_client;
pub mod order_store;
pub mod payment_client;

pub use catalog_client::*;
pub use order_store::*;
pub use payment_client::*;
