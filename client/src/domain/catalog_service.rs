//! Catalog service over the shared request pipeline.

use async_trait::async_trait;
use pagination::PageRequest;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::ports::{CatalogService, RequestExecutor};
use super::service_gateway::{ServiceGateway, Signing};
use super::{Product, ProductId, RequestDescriptor, ServiceResult};

#[derive(Deserialize)]
struct ProductsData {
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct ProductData {
    product: Product,
}

/// [`CatalogService`] backed by a request executor.
///
/// Catalog reads are public; they carry the session token when one exists.
#[derive(Clone)]
pub struct ApiCatalogService<E> {
    gateway: ServiceGateway<E>,
}

impl<E> ApiCatalogService<E> {
    /// Create the service over `gateway`.
    pub fn new(gateway: ServiceGateway<E>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<E> CatalogService for ApiCatalogService<E>
where
    E: RequestExecutor,
{
    #[instrument(skip_all, fields(offset = request.offset(), limit = request.limit().get()))]
    async fn get_product_list(&self, request: PageRequest) -> ServiceResult<Vec<Product>> {
        let descriptor = RequestDescriptor::get("products").with_query(request.query_pairs());
        let data: ProductsData = self.gateway.call(descriptor, Signing::IfPresent).await?;
        debug!(received = data.products.len(), "product page loaded");
        Ok(data.products)
    }

    #[instrument(skip_all, fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> ServiceResult<Product> {
        let descriptor = RequestDescriptor::get("products").with_segment(id.as_str());
        let data: ProductData = self.gateway.call(descriptor, Signing::IfPresent).await?;
        Ok(data.product)
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;
