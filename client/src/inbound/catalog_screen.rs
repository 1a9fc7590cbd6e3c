//! Catalog screen controller.
//!
//! Scroll and refresh events go to the [`FeedHandle`]; row taps and the buy
//! button fetch the product and navigate on success.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::ports::{CatalogService, Navigator, Notice, Notifier};
use crate::domain::{FeedClosed, FeedHandle, Product, ProductId, ServiceResult};

/// Glue between the catalog list view and the core.
pub struct CatalogScreen<C: ?Sized, N: ?Sized, V: ?Sized> {
    feed: FeedHandle,
    catalog: Arc<C>,
    notifier: Arc<N>,
    navigator: Arc<V>,
}

impl<C, N, V> CatalogScreen<C, N, V>
where
    C: CatalogService + ?Sized,
    N: Notifier + ?Sized,
    V: Navigator + ?Sized,
{
    /// Build the controller.
    pub fn new(feed: FeedHandle, catalog: Arc<C>, notifier: Arc<N>, navigator: Arc<V>) -> Self {
        Self {
            feed,
            catalog,
            notifier,
            navigator,
        }
    }

    /// Feed driving the list.
    pub fn feed(&self) -> &FeedHandle {
        &self.feed
    }

    /// The screen became visible.
    pub fn appeared(&self) -> Result<(), FeedClosed> {
        self.feed.activate()
    }

    /// The list scrolled; `near_end` is the view's proximity signal.
    pub fn scrolled(&self, near_end: bool) -> Result<(), FeedClosed> {
        self.feed.near_end(near_end)
    }

    /// Pull-to-refresh.
    pub fn refresh_requested(&self) -> Result<(), FeedClosed> {
        self.feed.refresh()
    }

    /// Retry button on the error footer.
    pub fn retry_requested(&self) -> Result<(), FeedClosed> {
        self.feed.retry()
    }

    /// A row was tapped: show the product detail.
    #[instrument(skip(self))]
    pub async fn product_selected(&self, id: &ProductId) {
        if let Some(product) = self.fetch(id).await {
            self.navigator.show_product(product);
        }
    }

    /// The buy button was tapped: open the order form.
    #[instrument(skip(self))]
    pub async fn buy_selected(&self, id: &ProductId) {
        if let Some(product) = self.fetch(id).await {
            self.navigator.show_order_form(product);
        }
    }

    async fn fetch(&self, id: &ProductId) -> Option<Product> {
        let result: ServiceResult<Product> = self.catalog.get_product(id).await;
        match result {
            Ok(product) => Some(product),
            Err(err) => {
                debug!(error = %err, "product lookup failed");
                self.notifier.notify(Notice::error(err.message()));
                None
            }
        }
    }
}
