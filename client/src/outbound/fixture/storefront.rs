//! Route handling for the in-memory storefront.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::ports::RequestExecutor;
use crate::domain::{
    ErrorResponse, FieldError, HexColor, OperationError, OrderConfirmation, OrderForm,
    OrderFormInput, OrderId, OrderStatus, OrderSummary, Product, ProductBadge, ProductId, Profile,
    RawPayload, RequestDescriptor, RequestMethod, ServiceResult,
};

const DEFAULT_LIMIT: usize = 20;

/// The single account the fixture accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureAccount {
    /// Sign-in email.
    pub email: String,
    /// Sign-in password.
    pub password: String,
    /// Profile returned by `GET user`.
    pub profile: Profile,
}

impl Default for FixtureAccount {
    fn default() -> Self {
        Self {
            email: "student@storefront.test".to_owned(),
            password: "letmein".to_owned(),
            profile: Profile {
                name: "Alex".to_owned(),
                surname: "Morgan".to_owned(),
                occupation: "Student".to_owned(),
                avatar_url: None,
            },
        }
    }
}

/// `count` generated products with ids `p-0` onwards.
pub fn demo_catalog(count: usize) -> Vec<Product> {
    const DEPARTMENTS: [&str; 3] = ["Clothes", "Accessories", "Stationery"];

    (0..count)
        .filter_map(|n| {
            let id = ProductId::new(format!("p-{n}")).ok()?;
            let badge = HexColor::new("#F2A900")
                .ok()
                .filter(|_| n % 5 == 0)
                .map(|color| ProductBadge {
                    value: "New".to_owned(),
                    color,
                });
            Some(Product {
                id,
                title: format!("Item {n}"),
                description: format!("Description of item {n}"),
                price: Decimal::new(1500 + 100 * i64::try_from(n).ok()?, 2),
                preview: format!("images/p-{n}/preview.png"),
                images: vec![format!("images/p-{n}/1.png"), format!("images/p-{n}/2.png")],
                department: DEPARTMENTS[n % DEPARTMENTS.len()].to_owned(),
                badge,
                details: vec!["100% cotton".to_owned()],
            })
        })
        .collect()
}

#[derive(Debug, Default)]
struct State {
    tokens: HashSet<String>,
    expired: HashSet<String>,
    issued: u64,
    orders: Vec<OrderSummary>,
    failures: VecDeque<OperationError>,
}

/// [`RequestExecutor`] serving the storefront API from memory.
#[derive(Debug)]
pub struct FixtureStorefront {
    account: FixtureAccount,
    catalog: Vec<Product>,
    state: Mutex<State>,
}

impl Default for FixtureStorefront {
    fn default() -> Self {
        Self::new(FixtureAccount::default(), demo_catalog(45))
    }
}

#[derive(Deserialize)]
struct SignInBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderBody {
    product_id: ProductId,
    #[serde(default)]
    size: Option<String>,
    quantity: Value,
    house: String,
    apartment: String,
    delivery_date: String,
}

enum Access {
    Granted,
    Denied(RawPayload),
}

impl FixtureStorefront {
    /// Storefront with one account and a fixed catalog.
    pub fn new(account: FixtureAccount, catalog: Vec<Product>) -> Self {
        Self {
            account,
            catalog,
            state: Mutex::new(State::default()),
        }
    }

    /// Account accepted by `POST user/signin`.
    pub fn account(&self) -> &FixtureAccount {
        &self.account
    }

    /// Fail the next request with `error` instead of answering it.
    ///
    /// Queued failures are consumed in order, one per request.
    pub fn fail_next(&self, error: OperationError) {
        self.lock().failures.push_back(error);
    }

    /// Expire every issued token; later signed calls get `token_expired`.
    pub fn expire_sessions(&self) {
        let mut state = self.lock();
        let tokens = std::mem::take(&mut state.tokens);
        state.expired.extend(tokens);
    }

    /// Orders placed so far, oldest first.
    pub fn orders(&self) -> Vec<OrderSummary> {
        self.lock().orders.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn route(&self, request: &RequestDescriptor) -> ServiceResult<RawPayload> {
        let segments: Vec<&str> = request.segments().iter().map(String::as_str).collect();
        match (request.method(), segments.as_slice()) {
            (RequestMethod::Post, ["user", "signin"]) => self.sign_in(request),
            (RequestMethod::Get, ["user"]) => self.guarded(request, |_| {
                data("profile", &self.account.profile)
            }),
            (RequestMethod::Get, ["products"]) => self.product_page(request),
            (RequestMethod::Get, ["products", id]) => self.product(id),
            (RequestMethod::Post, ["orders"]) => {
                self.guarded(request, |storefront| storefront.place_order(request))
            }
            (RequestMethod::Get, ["orders"]) => self.guarded(request, |storefront| {
                data("orders", &storefront.lock().orders)
            }),
            (RequestMethod::Delete, ["orders", id]) => {
                self.guarded(request, |storefront| storefront.cancel_order(id))
            }
            _ => Ok(failure(ErrorResponse::message("not found"))),
        }
    }

    fn guarded(
        &self,
        request: &RequestDescriptor,
        handler: impl FnOnce(&Self) -> ServiceResult<RawPayload>,
    ) -> ServiceResult<RawPayload> {
        match self.check_access(request) {
            Access::Granted => handler(self),
            Access::Denied(payload) => Ok(payload),
        }
    }

    fn check_access(&self, request: &RequestDescriptor) -> Access {
        let state = self.lock();
        match request.bearer_token().map(|token| token.expose()) {
            Some(token) if state.tokens.contains(token) => Access::Granted,
            Some(token) if state.expired.contains(token) => Access::Denied(failure(
                ErrorResponse::message("token expired").with_code("token_expired"),
            )),
            _ => Access::Denied(failure(
                ErrorResponse::message("unauthorized").with_code("unauthorized"),
            )),
        }
    }

    fn sign_in(&self, request: &RequestDescriptor) -> ServiceResult<RawPayload> {
        let Some(body) = parse_body::<SignInBody>(request) else {
            return Ok(failure(ErrorResponse::message("malformed request")));
        };
        if body.email != self.account.email || body.password != self.account.password {
            return Ok(failure(ErrorResponse::message("invalid credentials")));
        }

        let mut state = self.lock();
        state.issued += 1;
        let token = format!("fixture-token-{}", state.issued);
        state.tokens.insert(token.clone());
        Ok(json!({ "data": { "accessToken": token } }))
    }

    fn product_page(&self, request: &RequestDescriptor) -> ServiceResult<RawPayload> {
        let offset = query_number(request, "offset").unwrap_or(0);
        let limit = query_number(request, "limit").unwrap_or(DEFAULT_LIMIT);
        let page: Vec<&Product> = self.catalog.iter().skip(offset).take(limit).collect();
        data("products", &page)
    }

    fn product(&self, id: &str) -> ServiceResult<RawPayload> {
        match self.find_product(id) {
            Some(product) => data("product", product),
            None => Ok(failure(ErrorResponse::message("product not found"))),
        }
    }

    fn find_product(&self, id: &str) -> Option<&Product> {
        self.catalog.iter().find(|product| product.id.as_str() == id)
    }

    fn place_order(&self, request: &RequestDescriptor) -> ServiceResult<RawPayload> {
        let Some(body) = parse_body::<OrderBody>(request) else {
            return Ok(failure(ErrorResponse::message("malformed request")));
        };
        let Some(product) = self.find_product(body.product_id.as_str()) else {
            return Ok(failure(ErrorResponse::message("product not found")));
        };

        let input = OrderFormInput {
            size: body.size,
            quantity: match body.quantity {
                Value::String(text) => text,
                other => other.to_string(),
            },
            house: body.house,
            apartment: body.apartment,
            delivery_date: body.delivery_date,
        };
        let form = match OrderForm::try_from_input(body.product_id, &input) {
            Ok(form) => form,
            Err(fields) => return Ok(invalid_order(fields)),
        };

        let mut state = self.lock();
        let id = OrderId::new(format!("o-{}", state.orders.len() + 1));
        let confirmation = OrderConfirmation {
            id: id.clone(),
            status: OrderStatus::InWork,
            created_at: Utc::now(),
            eta: form.delivery_date(),
        };
        state.orders.push(OrderSummary {
            id,
            title: product.title.clone(),
            preview: product.preview.clone(),
            quantity: form.quantity(),
            size: form.size().map(str::to_owned),
            status: confirmation.status,
            created_at: confirmation.created_at,
            eta: confirmation.eta,
        });
        data("order", &confirmation)
    }

    fn cancel_order(&self, id: &str) -> ServiceResult<RawPayload> {
        let mut state = self.lock();
        let Some(order) = state.orders.iter_mut().find(|order| order.id.as_str() == id) else {
            return Ok(failure(ErrorResponse::message("order not found")));
        };
        if !order.status.is_active() {
            return Ok(failure(ErrorResponse::message("order is not in work")));
        }
        order.status = OrderStatus::Cancelled;
        Ok(json!({ "data": {} }))
    }
}

#[async_trait]
impl RequestExecutor for FixtureStorefront {
    async fn execute(&self, request: RequestDescriptor) -> ServiceResult<RawPayload> {
        if let Some(error) = self.lock().failures.pop_front() {
            debug!(%request, "fixture failing request on demand");
            return Err(error);
        }
        debug!(%request, "fixture answering request");
        self.route(&request)
    }
}

fn parse_body<T: DeserializeOwned>(request: &RequestDescriptor) -> Option<T> {
    request.body().and_then(|body| T::deserialize(body).ok())
}

fn query_number(request: &RequestDescriptor, key: &str) -> Option<usize> {
    request.query_value(key).and_then(|raw| raw.parse().ok())
}

fn data<T: Serialize + ?Sized>(key: &str, value: &T) -> ServiceResult<RawPayload> {
    let value = serde_json::to_value(value)
        .map_err(|error| OperationError::decoding(format!("fixture payload: {error}")))?;
    Ok(json!({ "data": { key: value } }))
}

fn failure(response: ErrorResponse) -> RawPayload {
    let mut payload = json!({ "message": response.message, "fields": response.fields });
    if let (Some(code), Some(object)) = (response.code, payload.as_object_mut()) {
        object.insert("code".to_owned(), Value::String(code));
    }
    payload
}

fn invalid_order(fields: Vec<FieldError>) -> RawPayload {
    failure(ErrorResponse::message("invalid order").with_fields(fields))
}

#[cfg(test)]
#[path = "storefront_tests.rs"]
mod tests;
