#![allow(dead_code)]

use actor_runtime::{FrameworkError, ServiceEndpoint, ServiceHandler};
use async_trait::async_trait;
use order_authority::clients::{CatalogReply, CatalogServiceClient, GatewayServiceClient, ValidateProducts};
use order_authority::config::OrderConfig;
use order_authority::lifecycle::OrderSystem;
use order_authority::model::{
    CatalogProduct, PaymentSession, PaymentSessionRequest, ProductId,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// An in-memory catalog whose products can be changed while the system runs.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<Mutex<HashMap<ProductId, CatalogProduct>>>,
    requests: Arc<Mutex<usize>>,
}

impl InMemoryCatalog {
    pub fn with_products(products: &[(u32, &str, i64)]) -> Self {
        let catalog = Self::default();
        for &(id, name, price) in products {
            catalog.upsert(id, name, Decimal::from(price));
        }
        catalog
    }

    pub fn upsert(&self, id: u32, name: &str, price: Decimal) {
        self.products
            .lock()
            .unwrap()
            .insert(ProductId(id), CatalogProduct::new(id, name, price));
    }

    pub fn request_count(&self) -> usize {
        *self.requests.lock().unwrap()
    }

    pub fn spawn(&self) -> CatalogServiceClient {
        let (endpoint, client) = ServiceEndpoint::<InMemoryCatalog>::new(16);
        tokio::spawn(endpoint.run(self.clone()));
        client
    }
}

#[async_trait]
impl ServiceHandler for InMemoryCatalog {
    type Request = ValidateProducts;
    type Reply = CatalogReply;

    async fn handle(&mut self, request: ValidateProducts) -> Result<CatalogReply, FrameworkError> {
        *self.requests.lock().unwrap() += 1;
        let products = self.products.lock().unwrap();
        let unknown: Vec<ProductId> = request
            .product_ids
            .iter()
            .filter(|id| !products.contains_key(*id))
            .copied()
            .collect();
        if !unknown.is_empty() {
            return Ok(CatalogReply::UnknownProducts(unknown));
        }
        Ok(CatalogReply::Products(
            request
                .product_ids
                .iter()
                .map(|id| products[id].clone())
                .collect(),
        ))
    }
}

/// A gateway that remembers every session request.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    pub requests: Arc<Mutex<Vec<PaymentSessionRequest>>>,
}

impl RecordingGateway {
    pub fn spawn(&self) -> GatewayServiceClient {
        let (endpoint, client) = ServiceEndpoint::<RecordingGateway>::new(16);
        tokio::spawn(endpoint.run(self.clone()));
        client
    }
}

#[async_trait]
impl ServiceHandler for RecordingGateway {
    type Request = PaymentSessionRequest;
    type Reply = PaymentSession;

    async fn handle(&mut self, request: PaymentSessionRequest) -> Result<PaymentSession, FrameworkError> {
        let session = PaymentSession(json!({
            "url": format!("https://checkout.example/{}", request.order_id),
        }));
        self.requests.lock().unwrap().push(request);
        Ok(session)
    }
}

/// Keyboard at 10, mouse at 5, cable at 2.
pub fn standard_catalog() -> InMemoryCatalog {
    InMemoryCatalog::with_products(&[(1, "Keyboard", 10), (2, "Mouse", 5), (3, "Cable", 2)])
}

pub fn start_system(catalog: &InMemoryCatalog, gateway: &RecordingGateway) -> OrderSystem {
    start_system_with(&OrderConfig::default(), catalog, gateway)
}

pub fn start_system_with(
    config: &OrderConfig,
    catalog: &InMemoryCatalog,
    gateway: &RecordingGateway,
) -> OrderSystem {
    OrderSystem::connect(config, catalog.spawn(), gateway.spawn())
}
