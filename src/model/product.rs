/// Catalog-side product data, as seen by the order authority.
///
/// The catalog is the single source of truth for names and prices. Nothing here is stored
/// except the price snapshot copied into each order item.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for catalog products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a catalog reply. Prices travel as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl CatalogProduct {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}
