//! # Product Catalog Client
//!
//! The catalog answers `validate_product` requests: given product ids, it returns their current
//! name and price, or rejects the request and names the ids it does not know.
use crate::model::{CatalogProduct, ProductId};
use crate::order_actor::OrderError;
use actor_runtime::{FrameworkError, ServiceClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// `validate_product` request body: a bare list of ids on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidateProducts {
    pub product_ids: Vec<ProductId>,
}

/// `validate_product` reply. On the wire both forms are bare arrays: product objects on
/// success, or the ids the catalog does not know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogReply {
    Products(Vec<CatalogProduct>),
    UnknownProducts(Vec<ProductId>),
}

/// Channel client for a catalog endpoint or a broker bridge in front of one.
pub type CatalogServiceClient = ServiceClient<ValidateProducts, CatalogReply>;

/// Request-reply access to the product catalog.
#[async_trait]
pub trait ProductCatalogClient: Send + Sync {
    async fn send(&self, request: ValidateProducts) -> Result<CatalogReply, FrameworkError>;

    /// Looks up every id, failing with [`OrderError::UnknownProducts`] if the catalog rejects
    /// any of them or leaves any out of its reply.
    #[instrument(skip(self))]
    async fn resolve(
        &self,
        product_ids: &[ProductId],
    ) -> Result<HashMap<ProductId, CatalogProduct>, OrderError> {
        debug!("Sending validate_product");
        let reply = self
            .send(ValidateProducts {
                product_ids: product_ids.to_vec(),
            })
            .await
            .map_err(|e| OrderError::transport("product catalog", e))?;

        let products = match reply {
            CatalogReply::Products(products) => products,
            CatalogReply::UnknownProducts(unknown) => {
                warn!(?unknown, "Catalog rejected products");
                return Err(OrderError::UnknownProducts(unknown));
            }
        };

        let index: HashMap<ProductId, CatalogProduct> =
            products.into_iter().map(|p| (p.id, p)).collect();
        let missing: Vec<ProductId> = product_ids
            .iter()
            .filter(|id| !index.contains_key(*id))
            .copied()
            .collect();
        if !missing.is_empty() {
            warn!(?missing, "Catalog reply is missing products");
            return Err(OrderError::UnknownProducts(missing));
        }
        Ok(index)
    }
}

#[async_trait]
impl ProductCatalogClient for CatalogServiceClient {
    async fn send(&self, request: ValidateProducts) -> Result<CatalogReply, FrameworkError> {
        ServiceClient::send(self, request).await
    }
}
