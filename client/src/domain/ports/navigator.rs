//! Port for screen transitions triggered by core outcomes.

use tracing::info;

use crate::domain::Product;

/// Moves the user between screens.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Open the product detail screen.
    fn show_product(&self, product: Product);

    /// Open the order form for `product`.
    fn show_order_form(&self, product: Product);

    /// Return to the sign-in screen.
    fn show_sign_in(&self);
}

/// Navigator that only logs transitions, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn show_product(&self, product: Product) {
        info!(product_id = %product.id, "navigate to product");
    }

    fn show_order_form(&self, product: Product) {
        info!(product_id = %product.id, "navigate to order form");
    }

    fn show_sign_in(&self) {
        info!("navigate to sign-in");
    }
}
