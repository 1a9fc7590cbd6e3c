//! Driving port for placing orders.

use async_trait::async_trait;

use crate::domain::{OrderConfirmation, OrderForm, ServiceResult};

/// Order façade used by the order form screen.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Submit a validated order form.
    async fn place_order(&self, form: &OrderForm) -> ServiceResult<OrderConfirmation>;
}
