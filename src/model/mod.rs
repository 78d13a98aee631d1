//! Pure data structures: the persisted order, its read views, and the wire shapes exchanged
//! with the catalog and the payment gateway.

pub mod order;
pub mod pagination;
pub mod payment;
pub mod product;

pub use order::*;
pub use pagination::*;
pub use payment::*;
pub use product::*;
