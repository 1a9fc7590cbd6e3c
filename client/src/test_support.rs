//! Test doubles for driving the catalog core without a UI or network.
//!
//! Enabled by the `test-support` feature. The recording doubles share their
//! log through an `Arc`, so a test keeps one clone and hands the other to the
//! code under test.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagination::PageRequest;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};

use crate::domain::list_diff::{self, ApplyError};
use crate::domain::ports::{CatalogService, Navigator, Notice, Notifier, RenderSink};
use crate::domain::{
    EditScript, ErrorResponse, OperationError, Product, ProductId, ServiceResult,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Product with id `id` and otherwise plain content.
pub fn sample_product(id: &str) -> Product {
    Product {
        id: ProductId::new(id).unwrap_or_else(|_| panic!("sample id {id:?} must not be blank")),
        title: format!("Product {id}"),
        description: String::new(),
        price: Decimal::new(1000, 2),
        preview: String::new(),
        images: Vec::new(),
        department: "Clothes".to_owned(),
        badge: None,
        details: Vec::new(),
    }
}

/// `len` products with ids `p-{start}` onwards.
pub fn sample_page(start: usize, len: usize) -> Vec<Product> {
    (start..start + len)
        .map(|n| sample_product(&format!("p-{n}")))
        .collect()
}

/// One call observed by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// Full snapshot.
    Reset(Vec<ProductId>),
    /// Incremental script.
    Apply(EditScript<Product>),
    /// Loading indicator toggled.
    Loading(bool),
}

#[derive(Debug, Default)]
struct SinkLog {
    visible: Vec<Product>,
    events: Vec<SinkEvent>,
    apply_errors: Vec<ApplyError>,
}

/// [`RenderSink`] that keeps a model of the visible list.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<SinkLog>>,
}

impl RecordingSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the visible list after every update so far.
    pub fn visible_ids(&self) -> Vec<ProductId> {
        lock(&self.log)
            .visible
            .iter()
            .map(|product| product.id.clone())
            .collect()
    }

    /// Every call in arrival order.
    pub fn events(&self) -> Vec<SinkEvent> {
        lock(&self.log).events.clone()
    }

    /// Scripts that did not fit the visible list.
    pub fn apply_errors(&self) -> Vec<ApplyError> {
        lock(&self.log).apply_errors.clone()
    }
}

impl RenderSink for RecordingSink {
    fn reset(&mut self, items: &[Product]) {
        let mut log = lock(&self.log);
        log.visible = items.to_vec();
        log.events.push(SinkEvent::Reset(
            items.iter().map(|product| product.id.clone()).collect(),
        ));
    }

    fn apply(&mut self, script: &EditScript<Product>) {
        let mut log = lock(&self.log);
        let mut visible = std::mem::take(&mut log.visible);
        if let Err(err) = list_diff::apply(&mut visible, script) {
            log.apply_errors.push(err);
        }
        log.visible = visible;
        log.events.push(SinkEvent::Apply(script.clone()));
    }

    fn set_loading(&mut self, loading: bool) {
        lock(&self.log).events.push(SinkEvent::Loading(loading));
    }
}

/// [`Notifier`] that remembers every notice.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    /// Empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices in arrival order.
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        lock(&self.notices).push(notice);
    }
}

/// Screen transition observed by a [`RecordingNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Product detail opened.
    Product(ProductId),
    /// Order form opened.
    OrderForm(ProductId),
    /// Sign-in screen shown.
    SignIn,
}

/// [`Navigator`] that remembers every transition.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    transitions: Arc<Mutex<Vec<Navigation>>>,
}

impl RecordingNavigator {
    /// Navigator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions in order.
    pub fn transitions(&self) -> Vec<Navigation> {
        lock(&self.transitions).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn show_product(&self, product: Product) {
        lock(&self.transitions).push(Navigation::Product(product.id));
    }

    fn show_order_form(&self, product: Product) {
        lock(&self.transitions).push(Navigation::OrderForm(product.id));
    }

    fn show_sign_in(&self) {
        lock(&self.transitions).push(Navigation::SignIn);
    }
}

/// A page request held open until the test answers it.
#[derive(Debug)]
pub struct PendingPage {
    request: PageRequest,
    reply: oneshot::Sender<ServiceResult<Vec<Product>>>,
}

impl PendingPage {
    /// Offset and limit asked for.
    pub fn request(&self) -> PageRequest {
        self.request
    }

    /// Complete the request with `result`.
    pub fn respond(self, result: ServiceResult<Vec<Product>>) {
        // The caller may have gone away; nothing to do then.
        let _ = self.reply.send(result);
    }
}

/// Receiving end of a [`GatedCatalog`]'s page requests.
#[derive(Debug)]
pub struct PageRequests {
    pending: mpsc::UnboundedReceiver<PendingPage>,
}

impl PageRequests {
    /// Wait for the next page request.
    pub async fn next(&mut self) -> Option<PendingPage> {
        self.pending.recv().await
    }

    /// Next page request if one has already arrived.
    pub fn try_next(&mut self) -> Option<PendingPage> {
        self.pending.try_recv().ok()
    }
}

/// [`CatalogService`] whose page requests stay open until answered.
///
/// Single-product reads are served from the products registered with
/// [`GatedCatalog::with_product`].
#[derive(Debug)]
pub struct GatedCatalog {
    pending: mpsc::UnboundedSender<PendingPage>,
    products: Mutex<HashMap<ProductId, Product>>,
}

impl GatedCatalog {
    /// New catalog plus the handle that receives its page requests.
    pub fn new() -> (Self, PageRequests) {
        let (pending, receiver) = mpsc::unbounded_channel();
        (
            Self {
                pending,
                products: Mutex::new(HashMap::new()),
            },
            PageRequests { pending: receiver },
        )
    }

    /// Make `product` available to [`CatalogService::get_product`].
    #[must_use]
    pub fn with_product(self, product: Product) -> Self {
        lock(&self.products).insert(product.id.clone(), product);
        self
    }
}

#[async_trait]
impl CatalogService for GatedCatalog {
    async fn get_product_list(&self, request: PageRequest) -> ServiceResult<Vec<Product>> {
        let (reply, response) = oneshot::channel();
        self.pending
            .send(PendingPage { request, reply })
            .map_err(|_| OperationError::transport("page requests are no longer observed"))?;
        response
            .await
            .map_err(|_| OperationError::transport("page request abandoned"))?
    }

    async fn get_product(&self, id: &ProductId) -> ServiceResult<Product> {
        lock(&self.products)
            .get(id)
            .cloned()
            .ok_or_else(|| OperationError::domain(ErrorResponse::message("product not found")))
    }
}
