//! Dashboard aggregates.

use crate::service::Services;
use serde::{Deserialize, Serialize};
use shopdesk_client::Envelope;
use tracing::debug;

/// Headline numbers for one business.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Number of orders.
    pub orders: usize,
    /// Number of customers.
    pub customers: usize,
    /// Number of products.
    pub products: usize,
    /// Sum of order totals.
    pub revenue: f64,
}

/// Computes [`DashboardStats`] from the order, customer and product lists.
#[derive(Debug, Clone)]
pub struct Dashboard {
    services: Services,
}

impl Dashboard {
    pub(crate) fn new(services: Services) -> Self {
        Self { services }
    }

    /// Aggregates the lists of `business_id`.
    ///
    /// The first failing list read is returned as the error. The result is
    /// tagged `isMock` when any list came from fallback data.
    pub async fn get_stats(&self, business_id: &str) -> Envelope<DashboardStats> {
        let orders = self.services.orders().list(business_id, &[]).await;
        let customers = self.services.customers().list(business_id, &[]).await;
        let products = self.services.products().list(business_id, &[]).await;
        let is_mock = orders.is_mock || customers.is_mock || products.is_mock;

        let orders = match orders.into_result() {
            Ok(orders) => orders.unwrap_or_default(),
            Err(err) => return Envelope::err(err),
        };
        let customers = match customers.into_result() {
            Ok(customers) => customers.unwrap_or_default(),
            Err(err) => return Envelope::err(err),
        };
        let products = match products.into_result() {
            Ok(products) => products.unwrap_or_default(),
            Err(err) => return Envelope::err(err),
        };

        let stats = DashboardStats {
            orders: orders.len(),
            customers: customers.len(),
            products: products.len(),
            revenue: orders.iter().map(|order| order.total_amount).sum(),
        };
        debug!(business_id, ?stats, is_mock, "computed dashboard stats");

        if is_mock {
            Envelope::mock(stats)
        } else {
            Envelope::ok(stats)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use shopdesk_client::{DataClient, ResilientClient, Row};
    use shopdesk_store::MemoryStore;
    use std::sync::Arc;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn sums_order_totals() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(
                "orders",
                vec![
                    row(json!({"business_id": "B1", "total_amount": 10.5})),
                    row(json!({"business_id": "B1", "total_amount": 4.5})),
                    row(json!({"business_id": "B1"})),
                    row(json!({"business_id": "B2", "total_amount": 100})),
                ],
            )
            .unwrap();
        store
            .seed("customers", vec![row(json!({"business_id": "B1", "name": "A"}))])
            .unwrap();
        let services = Services::new(ResilientClient::new(DataClient::new(store)));

        let stats = services.dashboard().get_stats("B1").await.data.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                orders: 3,
                customers: 1,
                products: 0,
                revenue: 15.0,
            }
        );
    }

    #[tokio::test]
    async fn null_and_text_totals_are_tolerated() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed(
                "orders",
                vec![
                    row(json!({"business_id": "B1", "total_amount": 10})),
                    row(json!({"business_id": "B1", "total_amount": null})),
                    row(json!({"business_id": "B1", "total_amount": "2.5"})),
                ],
            )
            .unwrap();
        let services = Services::new(ResilientClient::new(DataClient::new(store)));

        let result = services.dashboard().get_stats("B1").await;

        assert!(result.error.is_none());
        let stats = result.data.unwrap();
        assert_eq!(stats.orders, 3);
        assert_eq!(stats.revenue, 12.5);
    }

    #[tokio::test]
    async fn blank_business_id_is_passed_through() {
        let services = Services::new(ResilientClient::new(DataClient::new(Arc::new(
            MemoryStore::new(),
        ))));
        let result = services.dashboard().get_stats("").await;
        assert_eq!(result.error_code(), Some("VALIDATION_ERROR"));
    }
}
