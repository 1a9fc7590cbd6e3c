//! Driving port for the order history screen.

use async_trait::async_trait;

use crate::domain::{OrderFilter, OrderId, OrderSummary, ServiceResult};

/// Order history façade.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryService: Send + Sync {
    /// List orders matching `filter`, newest first as served.
    async fn get_orders(&self, filter: OrderFilter) -> ServiceResult<Vec<OrderSummary>>;

    /// Cancel an order.
    async fn cancel_order(&self, id: &OrderId) -> ServiceResult<()>;
}
