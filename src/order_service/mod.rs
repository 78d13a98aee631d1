//! Orchestration on top of the store and the collaborators.

pub mod aggregator;
pub mod lifecycle;
pub mod payments;

pub use aggregator::*;
pub use lifecycle::*;
pub use payments::*;
