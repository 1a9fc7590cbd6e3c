//! Driving port for catalog reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Product, ProductId, ServiceResult};

/// Catalog façade used by the paginated feed and product screens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch one page of products.
    async fn get_product_list(&self, request: PageRequest) -> ServiceResult<Vec<Product>>;

    /// Fetch a single product; unknown ids fail with a domain error.
    async fn get_product(&self, id: &ProductId) -> ServiceResult<Product>;
}
