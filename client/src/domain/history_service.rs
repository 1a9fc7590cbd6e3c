//! Order history service over the shared request pipeline.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing::{info, instrument};

use super::ports::{HistoryService, RequestExecutor};
use super::service_gateway::{ServiceGateway, Signing};
use super::{OrderFilter, OrderId, OrderSummary, RequestDescriptor, ServiceResult};

#[derive(Deserialize)]
struct OrdersData {
    orders: Vec<OrderSummary>,
}

/// [`HistoryService`] backed by a request executor.
///
/// The server has no status filter; [`OrderFilter::ActiveOnly`] is applied
/// to the full listing.
#[derive(Clone)]
pub struct ApiHistoryService<E> {
    gateway: ServiceGateway<E>,
}

impl<E> ApiHistoryService<E> {
    /// Create the service over `gateway`.
    pub fn new(gateway: ServiceGateway<E>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<E> HistoryService for ApiHistoryService<E>
where
    E: RequestExecutor,
{
    #[instrument(skip_all, fields(filter = ?filter))]
    async fn get_orders(&self, filter: OrderFilter) -> ServiceResult<Vec<OrderSummary>> {
        let data: OrdersData = self
            .gateway
            .call(RequestDescriptor::get("orders"), Signing::Required)
            .await?;
        Ok(data
            .orders
            .into_iter()
            .filter(|summary| filter.accepts(summary))
            .collect())
    }

    #[instrument(skip_all, fields(order_id = %id))]
    async fn cancel_order(&self, id: &OrderId) -> ServiceResult<()> {
        let descriptor = RequestDescriptor::delete("orders").with_segment(id.as_str());
        let _: IgnoredAny = self.gateway.call(descriptor, Signing::Required).await?;
        info!("order cancelled");
        Ok(())
    }
}

#[cfg(test)]
#[path = "history_service_tests.rs"]
mod tests;
