//! Tests for the in-memory storefront, driven through the real services.

use std::sync::Arc;

use pagination::{PageLimit, PageRequest};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{AuthService, CatalogService, HistoryService, OrderService};
use crate::domain::{
    AccessToken, ApiAuthService, ApiCatalogService, ApiHistoryService, ApiOrderService,
    ErrorKind, LoginCredentials, OrderFilter, ServiceGateway, SessionStore,
};

struct Services {
    storefront: Arc<FixtureStorefront>,
    session: SessionStore,
    auth: ApiAuthService<FixtureStorefront>,
    catalog: ApiCatalogService<FixtureStorefront>,
    orders: ApiOrderService<FixtureStorefront>,
    history: ApiHistoryService<FixtureStorefront>,
}

#[fixture]
fn services() -> Services {
    let storefront = Arc::new(FixtureStorefront::default());
    let session = SessionStore::new();
    let gateway = ServiceGateway::new(Arc::clone(&storefront), session.clone());
    Services {
        storefront,
        session,
        auth: ApiAuthService::new(gateway.clone()),
        catalog: ApiCatalogService::new(gateway.clone()),
        orders: ApiOrderService::new(gateway.clone()),
        history: ApiHistoryService::new(gateway),
    }
}

impl Services {
    async fn sign_in(&self) -> AccessToken {
        let account = self.storefront.account();
        let credentials = LoginCredentials::try_from_parts(&account.email, &account.password)
            .expect("valid credentials");
        self.auth
            .authenticate(&credentials)
            .await
            .expect("sign-in succeeds")
    }

    fn order_input(&self) -> OrderFormInput {
        OrderFormInput {
            size: Some("M".to_owned()),
            quantity: "2".to_owned(),
            house: "12 Market Street".to_owned(),
            apartment: "4".to_owned(),
            delivery_date: "2026-11-02".to_owned(),
        }
    }

    async fn place_order(&self) -> OrderConfirmation {
        let form = OrderForm::try_from_input(product_id("p-3"), &self.order_input())
            .expect("valid form");
        self.orders.place_order(&form).await.expect("order accepted")
    }
}

fn product_id(raw: &str) -> ProductId {
    ProductId::new(raw).expect("valid id")
}

fn page(offset: u32, limit: u32) -> PageRequest {
    PageRequest::new(offset, PageLimit::new(limit).expect("valid limit"))
}

#[rstest]
fn demo_catalog_has_unique_ids() {
    let catalog = demo_catalog(45);
    let ids: HashSet<_> = catalog.iter().map(|product| product.id.clone()).collect();
    assert_eq!(ids.len(), 45);
    assert_eq!(
        catalog[0].badge.as_ref().map(|badge| badge.value.as_str()),
        Some("New")
    );
    assert!(catalog[1].badge.is_none());
}

#[rstest]
#[tokio::test]
async fn sign_in_then_profile(services: Services) {
    let token = services.sign_in().await;
    assert_eq!(services.session.current_token(), Some(token));

    let profile = services.auth.get_profile().await.expect("profile");
    assert_eq!(profile.display_name(), "Alex Morgan");
}

#[rstest]
#[tokio::test]
async fn wrong_password_is_a_domain_error(services: Services) {
    let credentials =
        LoginCredentials::try_from_parts("student@storefront.test", "nope").expect("valid input");
    let error = services
        .auth
        .authenticate(&credentials)
        .await
        .expect_err("rejected");

    assert_eq!(error.kind(), ErrorKind::Domain);
    assert_eq!(error.message(), "invalid credentials");
    assert!(!services.session.is_authenticated());
}

#[rstest]
#[case::first(page(0, 20), 20, "p-0")]
#[case::middle(page(20, 12), 12, "p-20")]
#[case::tail(page(44, 12), 1, "p-44")]
#[case::past_the_end(page(60, 12), 0, "")]
#[tokio::test]
async fn pages_slice_the_catalog(
    services: Services,
    #[case] request: PageRequest,
    #[case] expected_len: usize,
    #[case] first_id: &str,
) {
    let products = services
        .catalog
        .get_product_list(request)
        .await
        .expect("page");
    assert_eq!(products.len(), expected_len);
    assert_eq!(
        products.first().map(|product| product.id.as_str()).unwrap_or(""),
        first_id
    );
}

#[rstest]
#[tokio::test]
async fn unknown_product_is_not_found(services: Services) {
    let error = services
        .catalog
        .get_product(&product_id("missing"))
        .await
        .expect_err("not found");
    assert_eq!(error.kind(), ErrorKind::Domain);
    assert_eq!(error.message(), "product not found");
}

#[rstest]
#[tokio::test]
async fn forged_tokens_are_unauthorized(services: Services) {
    let request = RequestDescriptor::get("orders").signed_with(Some(AccessToken::new("forged")));
    let payload = services.storefront.execute(request).await.expect("payload");
    assert_eq!(
        payload,
        json!({ "message": "unauthorized", "fields": null, "code": "unauthorized" })
    );
}

#[rstest]
#[tokio::test]
async fn placed_orders_show_up_in_history_until_cancelled(services: Services) {
    services.sign_in().await;
    let confirmation = services.place_order().await;
    assert_eq!(confirmation.status, OrderStatus::InWork);

    let active = services
        .history
        .get_orders(OrderFilter::ActiveOnly)
        .await
        .expect("history");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].title, "Item 3");
    assert_eq!(active[0].quantity, 2);

    services
        .history
        .cancel_order(&confirmation.id)
        .await
        .expect("cancelled");
    let active = services
        .history
        .get_orders(OrderFilter::ActiveOnly)
        .await
        .expect("history");
    assert!(active.is_empty());
    let all = services.history.get_orders(OrderFilter::All).await.expect("history");
    assert_eq!(all[0].status, OrderStatus::Cancelled);

    let again = services
        .history
        .cancel_order(&confirmation.id)
        .await
        .expect_err("already cancelled");
    assert_eq!(again.message(), "order is not in work");
}

#[rstest]
#[tokio::test]
async fn invalid_order_bodies_return_field_errors(services: Services) {
    let token = services.sign_in().await;
    let request = RequestDescriptor::post("orders")
        .with_json_body(&json!({
            "productId": "p-1",
            "quantity": 0,
            "house": "",
            "apartment": "1",
            "deliveryDate": "soon",
        }))
        .expect("encodable")
        .signed_with(Some(token));
    let payload = services.storefront.execute(request).await.expect("payload");

    let fields: Vec<&str> = payload["fields"]
        .as_array()
        .expect("field list")
        .iter()
        .filter_map(|field| field["field"].as_str())
        .collect();
    assert_eq!(payload["message"], "invalid order");
    assert_eq!(fields, ["quantity", "house", "deliveryDate"]);
    assert!(services.storefront.orders().is_empty());
}

#[rstest]
#[tokio::test]
async fn expired_sessions_sign_the_user_out(services: Services) {
    services.sign_in().await;
    services.storefront.expire_sessions();

    let error = services.auth.get_profile().await.expect_err("expired");
    assert!(error.is_authorization_failure());
    assert!(!services.session.is_authenticated());
}

#[rstest]
#[tokio::test]
async fn queued_failures_are_consumed_once(services: Services) {
    services
        .storefront
        .fail_next(OperationError::transport("offline"));

    let error = services
        .catalog
        .get_product_list(page(0, 20))
        .await
        .expect_err("failure injected");
    assert_eq!(error.kind(), ErrorKind::Transport);
    assert!(services.catalog.get_product_list(page(0, 20)).await.is_ok());
}
