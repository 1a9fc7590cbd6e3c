//! Order placement service over the shared request pipeline.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use super::ports::{OrderService, RequestExecutor};
use super::service_gateway::{ServiceGateway, Signing};
use super::{OrderConfirmation, OrderForm, RequestDescriptor, ServiceResult};

#[derive(Deserialize)]
struct OrderData {
    order: OrderConfirmation,
}

/// [`OrderService`] backed by a request executor.
#[derive(Clone)]
pub struct ApiOrderService<E> {
    gateway: ServiceGateway<E>,
}

impl<E> ApiOrderService<E> {
    /// Create the service over `gateway`.
    pub fn new(gateway: ServiceGateway<E>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<E> OrderService for ApiOrderService<E>
where
    E: RequestExecutor,
{
    #[instrument(skip_all, fields(product_id = %form.product_id(), quantity = form.quantity()))]
    async fn place_order(&self, form: &OrderForm) -> ServiceResult<OrderConfirmation> {
        let descriptor = RequestDescriptor::post("orders").with_json_body(form)?;
        let data: OrderData = self.gateway.call(descriptor, Signing::Required).await?;
        info!(order_id = %data.order.id, "order placed");
        Ok(data.order)
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
