//! Order form controller.

use std::sync::Arc;

use tracing::instrument;

use super::FormOutcome;
use crate::domain::ports::{Notice, Notifier, OrderService};
use crate::domain::{OrderConfirmation, OrderForm, OrderFormInput, ProductId};

/// Validates order inputs locally, then places the order.
pub struct OrderFormScreen<O: ?Sized, N: ?Sized> {
    orders: Arc<O>,
    notifier: Arc<N>,
}

impl<O, N> OrderFormScreen<O, N>
where
    O: OrderService + ?Sized,
    N: Notifier + ?Sized,
{
    /// Build the controller.
    pub fn new(orders: Arc<O>, notifier: Arc<N>) -> Self {
        Self { orders, notifier }
    }

    /// Submit the form for `product_id`.
    ///
    /// Local and server-side field errors come back the same way; any other
    /// failure is shown as a notice.
    #[instrument(skip(self, input), fields(product_id = %product_id))]
    pub async fn submit(
        &self,
        product_id: ProductId,
        input: &OrderFormInput,
    ) -> FormOutcome<OrderConfirmation> {
        let form = match OrderForm::try_from_input(product_id, input) {
            Ok(form) => form,
            Err(fields) => return FormOutcome::FieldErrors(fields),
        };
        match self.orders.place_order(&form).await {
            Ok(confirmation) => {
                self.notifier.notify(Notice::success("order placed"));
                FormOutcome::Accepted(confirmation)
            }
            Err(err) => FormOutcome::from_error(&err, self.notifier.as_ref()),
        }
    }
}
