//! Listing parameters and the page envelope returned by `list`.

use crate::model::OrderStatus;
use crate::order_actor::OrderError;
use serde::{Deserialize, Serialize};

/// Query for a page of orders. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderPagination {
    pub status: Option<OrderStatus>,
    pub page: u32,
    pub limit: u32,
}

impl Default for OrderPagination {
    fn default() -> Self {
        Self {
            status: None,
            page: 1,
            limit: 10,
        }
    }
}

impl OrderPagination {
    pub fn new(status: Option<OrderStatus>, page: u32, limit: u32) -> Self {
        Self {
            status,
            page,
            limit,
        }
    }

    pub fn validate(&self) -> Result<(), OrderError> {
        if self.page == 0 {
            return Err(OrderError::ValidationError("page must be a positive number".into()));
        }
        if self.limit == 0 {
            return Err(OrderError::ValidationError("limit must be a positive number".into()));
        }
        Ok(())
    }

    /// Number of matching orders that precede this page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }

    pub fn filter(&self) -> OrderFilter {
        OrderFilter {
            status: self.status,
        }
    }
}

/// Listing predicate evaluated inside the order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: usize,
    pub page: u32,
    pub last_page: u32,
}

impl PageMeta {
    pub fn new(total: usize, page: u32, limit: u32) -> Self {
        let last_page = total.div_ceil(limit.max(1) as usize);
        Self {
            total,
            page,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_rounds_up() {
        assert_eq!(PageMeta::new(25, 2, 10).last_page, 3);
        assert_eq!(PageMeta::new(30, 1, 10).last_page, 3);
        assert_eq!(PageMeta::new(0, 1, 10).last_page, 0);
    }

    #[test]
    fn test_offset_and_defaults() {
        let query = OrderPagination::default();
        assert_eq!((query.page, query.limit, query.offset()), (1, 10, 0));
        assert_eq!(OrderPagination::new(None, 3, 10).offset(), 20);
    }

    #[test]
    fn test_zero_page_or_limit_is_invalid() {
        assert!(matches!(
            OrderPagination::new(None, 0, 10).validate(),
            Err(OrderError::ValidationError(_))
        ));
        assert!(OrderPagination::new(None, 1, 0).validate().is_err());
        assert!(OrderPagination::new(Some(OrderStatus::Paid), 4, 1).validate().is_ok());
    }

    #[test]
    fn test_query_deserializes_with_defaults() {
        let query: OrderPagination = serde_json::from_str(r#"{"status":"PAID","page":2}"#).unwrap();
        assert_eq!(query, OrderPagination::new(Some(OrderStatus::Paid), 2, 10));
    }
}
