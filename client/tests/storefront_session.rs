//! End-to-end flows over the in-memory storefront: sign in, order, history,
//! and the sign-in redirect when the server expires the session.

use std::sync::Arc;

use rstest::{fixture, rstest};
use storefront_client::domain::ports::{HistoryService, NoticeLevel};
use storefront_client::domain::{
    ApiAuthService, ApiHistoryService, ApiOrderService, OrderFilter, OrderFormInput, OrderStatus,
    ProductId, ServiceGateway, SessionStore,
};
use storefront_client::inbound::{FormOutcome, OrderFormScreen, SignInForm, spawn_session_guard};
use storefront_client::outbound::fixture::FixtureStorefront;
use storefront_client::test_support::{Navigation, RecordingNavigator, RecordingNotifier};

struct App {
    storefront: Arc<FixtureStorefront>,
    session: SessionStore,
    notifier: RecordingNotifier,
    sign_in: SignInForm<ApiAuthService<FixtureStorefront>, RecordingNotifier>,
    order_form: OrderFormScreen<ApiOrderService<FixtureStorefront>, RecordingNotifier>,
    history: ApiHistoryService<FixtureStorefront>,
}

#[fixture]
fn app() -> App {
    let storefront = Arc::new(FixtureStorefront::default());
    let session = SessionStore::new();
    let notifier = RecordingNotifier::new();
    let gateway = ServiceGateway::new(Arc::clone(&storefront), session.clone());
    App {
        sign_in: SignInForm::new(
            Arc::new(ApiAuthService::new(gateway.clone())),
            Arc::new(notifier.clone()),
        ),
        order_form: OrderFormScreen::new(
            Arc::new(ApiOrderService::new(gateway.clone())),
            Arc::new(notifier.clone()),
        ),
        history: ApiHistoryService::new(gateway),
        storefront,
        session,
        notifier,
    }
}

fn order_input(quantity: &str) -> OrderFormInput {
    OrderFormInput {
        size: Some("L".to_owned()),
        quantity: quantity.to_owned(),
        house: "1 High Street".to_owned(),
        apartment: "2".to_owned(),
        delivery_date: "2026-12-01".to_owned(),
    }
}

fn product(raw: &str) -> ProductId {
    ProductId::new(raw).expect("valid id")
}

impl App {
    async fn sign_in(&self) {
        let account = self.storefront.account().clone();
        let outcome = self.sign_in.submit(&account.email, &account.password).await;
        assert_eq!(outcome, FormOutcome::Accepted(account.profile));
    }
}

#[rstest]
#[tokio::test]
async fn ordering_while_signed_out_is_refused_locally(app: App) {
    let outcome = app.order_form.submit(product("p-1"), &order_input("1")).await;

    assert_eq!(outcome, FormOutcome::Notified);
    assert!(app.storefront.orders().is_empty());
    let notices = app.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "unauthenticated");
}

#[rstest]
#[tokio::test]
async fn signed_in_orders_appear_in_active_history(app: App) {
    app.sign_in().await;

    let outcome = app.order_form.submit(product("p-2"), &order_input("3")).await;
    assert!(outcome.is_accepted());
    assert_eq!(app.notifier.notices()[0].level, NoticeLevel::Success);

    let active = app
        .history
        .get_orders(OrderFilter::ActiveOnly)
        .await
        .expect("history loads");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].status, OrderStatus::InWork);
    assert_eq!(active[0].size.as_deref(), Some("L"));
}

#[rstest]
#[tokio::test]
async fn server_validation_matches_local_validation(app: App) {
    app.sign_in().await;

    let outcome = app.order_form.submit(product("p-2"), &order_input("0")).await;
    let FormOutcome::FieldErrors(fields) = outcome else {
        panic!("expected field errors");
    };
    assert_eq!(fields[0].field, "quantity");
    assert!(app.notifier.notices().is_empty());
}

#[rstest]
#[tokio::test]
async fn unknown_products_cannot_be_ordered(app: App) {
    app.sign_in().await;

    let outcome = app.order_form.submit(product("p-999"), &order_input("1")).await;
    assert_eq!(outcome, FormOutcome::Notified);
    assert_eq!(app.notifier.notices()[0].message, "product not found");
}

#[rstest]
#[tokio::test]
async fn expired_session_redirects_to_sign_in(app: App) {
    let navigator = RecordingNavigator::new();
    let guard = spawn_session_guard(&app.session, Arc::new(navigator.clone()));
    app.sign_in().await;

    app.storefront.expire_sessions();
    let error = app
        .history
        .get_orders(OrderFilter::All)
        .await
        .expect_err("expired token is rejected");
    assert!(error.is_authorization_failure());
    assert!(!app.session.is_authenticated());

    drop(app);
    guard.await.expect("guard exits cleanly");
    assert_eq!(navigator.transitions(), [Navigation::SignIn]);
}
