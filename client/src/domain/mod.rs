//! Catalog session core: typed results, envelopes, session and services.
//!
//! Purpose: hold everything the storefront screens depend on that is not
//! presentation. Adapters live in `outbound`, screen glue in `inbound`; both
//! reach the core only through the traits in [`ports`].
//!
//! Public surface:
//! - [`OperationError`] / [`ServiceResult`]: the result of every service call.
//! - [`decode_response`]: the success/failure envelope decoder.
//! - [`SessionStore`]: the shared access-token holder.
//! - `Api*Service`: service façades over a [`ports::RequestExecutor`].
//! - [`PaginatedList`] and [`CatalogFeed`]: page bookkeeping and its driver.
//! - [`list_diff`]: keyed edit scripts for the rendered list.

pub mod auth;
pub mod auth_service;
pub mod catalog_feed;
pub mod catalog_service;
pub mod envelope;
pub mod error;
pub mod history_service;
pub mod list_diff;
pub mod order;
pub mod order_service;
pub mod paginated_list;
pub mod ports;
pub mod product;
pub mod request;
pub mod service_gateway;
pub mod session;

pub use self::auth::{LoginCredentials, LoginValidationError, Profile};
pub use self::auth_service::ApiAuthService;
pub use self::catalog_feed::{CatalogFeed, FeedClosed, FeedHandle, FeedSnapshot};
pub use self::catalog_service::ApiCatalogService;
pub use self::envelope::{RawPayload, ResponseEnvelope, decode_envelope, decode_response};
pub use self::error::{
    ErrorKind, ErrorPresentation, ErrorResponse, FieldError, OperationError, ServiceResult,
    UNAUTHENTICATED_MESSAGE,
};
pub use self::history_service::ApiHistoryService;
pub use self::list_diff::{EditOp, EditScript, Keyed};
pub use self::order::{
    EMPTY_FIELD_MESSAGE, OrderConfirmation, OrderFilter, OrderForm, OrderFormInput, OrderId,
    OrderStatus, OrderSummary,
};
pub use self::order_service::ApiOrderService;
pub use self::paginated_list::{
    Completion, ListPhase, ListStatus, LoadKind, PageLoad, PageSizes, PaginatedList,
};
pub use self::product::{HexColor, Product, ProductBadge, ProductId, ProductValidationError};
pub use self::request::{RequestDescriptor, RequestMethod};
pub use self::service_gateway::{ServiceGateway, Signing};
pub use self::session::{AccessToken, SessionStore, TokenWatcher};
