//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`RequestExecutor`], [`RenderSink`], [`Notifier`],
//! [`Navigator`]) are implemented by adapters and presentation code. Driving
//! ports ([`AuthService`], [`CatalogService`], [`OrderService`],
//! [`HistoryService`]) are the façades screens call.

mod auth_service;
mod catalog_service;
mod history_service;
mod navigator;
mod notifier;
mod order_service;
mod render_sink;
mod request_executor;

pub use auth_service::AuthService;
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use catalog_service::CatalogService;
#[cfg(test)]
pub use catalog_service::MockCatalogService;
pub use history_service::HistoryService;
#[cfg(test)]
pub use history_service::MockHistoryService;
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::{LoggingNavigator, Navigator};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Notice, NoticeLevel, Notifier, TracingNotifier};
#[cfg(test)]
pub use order_service::MockOrderService;
pub use order_service::OrderService;
#[cfg(test)]
pub use render_sink::MockRenderSink;
pub use render_sink::{NullRenderSink, RenderSink};
#[cfg(test)]
pub use request_executor::MockRequestExecutor;
pub use request_executor::RequestExecutor;
