//! Turns requested items into a priced, persistable draft.

use crate::clients::ProductCatalogClient;
use crate::model::{distinct_product_ids, validate_lines, OrderDraft, OrderItem, OrderItemRequest};
use crate::order_actor::OrderError;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct OrderAggregator {
    catalog: Arc<dyn ProductCatalogClient>,
}

impl OrderAggregator {
    pub fn new(catalog: Arc<dyn ProductCatalogClient>) -> Self {
        Self { catalog }
    }

    /// Prices every item from the catalog and sums the totals. Caller-side prices don't exist;
    /// the catalog is asked once, for the distinct ids.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn build(&self, items: &[OrderItemRequest]) -> Result<OrderDraft, OrderError> {
        validate_lines(items.iter().map(|item| (item.product_id, item.quantity)))?;

        let product_ids = distinct_product_ids(items.iter().map(|item| item.product_id));
        let products = self.catalog.resolve(&product_ids).await?;

        let mut priced = Vec::with_capacity(items.len());
        for item in items {
            let product = products
                .get(&item.product_id)
                .ok_or_else(|| OrderError::UnknownProducts(vec![item.product_id]))?;
            priced.push(OrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price: product.price,
            });
        }

        let draft = OrderDraft::from_items(priced)?;
        debug!(total_amount = %draft.total_amount, total_items = draft.total_items, "Draft built");
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{CatalogReply, ValidateProducts};
    use crate::model::{CatalogProduct, ProductId};
    use actor_runtime::mock::MockService;
    use actor_runtime::FrameworkError;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    /// Answers from a fixed price list.
    struct PriceList(HashMap<ProductId, Decimal>);

    #[async_trait]
    impl ProductCatalogClient for PriceList {
        async fn send(&self, request: ValidateProducts) -> Result<CatalogReply, FrameworkError> {
            let unknown: Vec<ProductId> = request
                .product_ids
                .iter()
                .filter(|id| !self.0.contains_key(*id))
                .copied()
                .collect();
            if !unknown.is_empty() {
                return Ok(CatalogReply::UnknownProducts(unknown));
            }
            Ok(CatalogReply::Products(
                request
                    .product_ids
                    .iter()
                    .map(|id| CatalogProduct::new(*id, format!("product {id}"), self.0[id]))
                    .collect(),
            ))
        }
    }

    fn aggregator(prices: &[(u32, i64)]) -> OrderAggregator {
        let prices = prices
            .iter()
            .map(|&(id, price)| (ProductId(id), Decimal::from(price)))
            .collect();
        OrderAggregator::new(Arc::new(PriceList(prices)))
    }

    #[tokio::test]
    async fn test_totals_for_two_products() {
        let draft = aggregator(&[(1, 10), (2, 5)])
            .build(&[OrderItemRequest::new(1, 2), OrderItemRequest::new(2, 3)])
            .await
            .unwrap();

        assert_eq!(draft.total_items, 5);
        assert_eq!(draft.total_amount, Decimal::from(35));
        assert_eq!(draft.items[0].price, Decimal::from(10));
        assert_eq!(draft.items[1].price, Decimal::from(5));
    }

    #[tokio::test]
    async fn test_totals_past_the_decimal_range_are_a_validation_error() {
        let mut prices = HashMap::new();
        prices.insert(ProductId(1), Decimal::from_i128_with_scale(10i128.pow(26), 0));
        let aggregator = OrderAggregator::new(Arc::new(PriceList(prices)));

        let err = aggregator
            .build(&[OrderItemRequest::new(1, 1000)])
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(msg) if msg.contains("overflows")));
    }

    #[tokio::test]
    async fn test_catalog_is_asked_once_for_distinct_ids() {
        let mock = MockService::<ValidateProducts, CatalogReply>::new();
        mock.expect().return_ok(CatalogReply::Products(vec![
            CatalogProduct::new(4, "Cable", Decimal::new(250, 2)),
            CatalogProduct::new(2, "Mouse", Decimal::from(5)),
        ]));
        let aggregator = OrderAggregator::new(Arc::new(mock.client()));

        let draft = aggregator
            .build(&[
                OrderItemRequest::new(4, 1),
                OrderItemRequest::new(2, 1),
                OrderItemRequest::new(4, 3),
            ])
            .await
            .unwrap();

        assert_eq!(draft.items.len(), 3);
        assert_eq!(draft.total_items, 5);
        assert_eq!(draft.total_amount, Decimal::new(1500, 2));
        assert_eq!(
            mock.received(),
            vec![ValidateProducts {
                product_ids: vec![ProductId(4), ProductId(2)]
            }]
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_invalid_requests_never_reach_the_catalog() {
        let mock = MockService::<ValidateProducts, CatalogReply>::new();
        let aggregator = OrderAggregator::new(Arc::new(mock.client()));

        let err = aggregator.build(&[]).await.unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)));

        let err = aggregator
            .build(&[OrderItemRequest::new(1, 1), OrderItemRequest::new(2, 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(msg) if msg.contains('2')));

        assert!(mock.received().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product_fails() {
        let err = aggregator(&[(1, 10)])
            .build(&[OrderItemRequest::new(1, 1), OrderItemRequest::new(8, 1)])
            .await
            .unwrap_err();
        assert_eq!(err, OrderError::UnknownProducts(vec![ProductId(8)]));
    }

    proptest! {
        /// Property: totals equal Σ catalog price × quantity and Σ quantity.
        #[test]
        fn totals_follow_catalog_prices(
            prices in prop::collection::hash_map(1u32..30, 0i64..10_000, 1..10),
            picks in prop::collection::vec((any::<prop::sample::Index>(), 1u32..100), 1..15),
        ) {
            let ids: Vec<u32> = prices.keys().copied().collect();
            let requests: Vec<OrderItemRequest> = picks
                .iter()
                .map(|(index, quantity)| OrderItemRequest::new(ids[index.index(ids.len())], *quantity))
                .collect();
            let catalog: Vec<(u32, i64)> = prices.iter().map(|(k, v)| (*k, *v)).collect();

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let draft = runtime
                .block_on(aggregator(&catalog).build(&requests))
                .unwrap();

            let expected_items: u64 = requests.iter().map(|r| u64::from(r.quantity)).sum();
            let expected_amount: Decimal = requests
                .iter()
                .map(|r| Decimal::from(prices[&r.product_id.0]) * Decimal::from(r.quantity))
                .sum();
            prop_assert_eq!(draft.total_items, expected_items);
            prop_assert_eq!(draft.total_amount, expected_amount);
        }
    }
}
