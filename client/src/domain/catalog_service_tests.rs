//! Tests for catalog page and product reads.

use std::sync::Arc;

use pagination::PageLimit;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::MockRequestExecutor;
use crate::domain::{ErrorKind, SessionStore};

fn product_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "description": "",
        "price": "10.00",
        "preview": "",
        "images": [],
        "department": "Clothes",
        "badge": { "value": "Hit", "color": "#FF0000" },
        "details": []
    })
}

#[fixture]
fn session() -> SessionStore {
    SessionStore::new()
}

fn service(
    executor: MockRequestExecutor,
    session: &SessionStore,
) -> ApiCatalogService<MockRequestExecutor> {
    ApiCatalogService::new(ServiceGateway::new(Arc::new(executor), session.clone()))
}

#[rstest]
#[tokio::test]
async fn product_list_sends_offset_and_limit(session: SessionStore) {
    let mut executor = MockRequestExecutor::new();
    executor
        .expect_execute()
        .withf(|request| {
            request.path() == "products"
                && request.query_value("offset") == Some("20")
                && request.query_value("limit") == Some("12")
        })
        .times(1)
        .return_once(|_| {
            Ok(json!({ "data": { "products": [product_json("a"), product_json("b")] } }))
        });

    let request = PageRequest::new(20, PageLimit::new(12).expect("valid limit"));
    let products = service(executor, &session)
        .get_product_list(request)
        .await
        .expect("page loads");

    let ids: Vec<_> = products.iter().map(|product| product.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[rstest]
#[tokio::test]
async fn product_list_is_readable_while_signed_out(session: SessionStore) {
    let mut executor = MockRequestExecutor::new();
    executor
        .expect_execute()
        .withf(|request| request.bearer_token().is_none())
        .times(1)
        .return_once(|_| Ok(json!({ "data": { "products": [] } })));

    let request = PageRequest::first(PageLimit::new(20).expect("valid limit"));
    let products = service(executor, &session)
        .get_product_list(request)
        .await
        .expect("page loads");
    assert!(products.is_empty());
}

#[rstest]
#[tokio::test]
async fn unknown_product_is_a_domain_error(session: SessionStore) {
    let mut executor = MockRequestExecutor::new();
    executor
        .expect_execute()
        .withf(|request| request.path() == "products/missing")
        .times(1)
        .return_once(|_| Ok(json!({ "message": "product not found", "fields": null })));

    let id = ProductId::new("missing").expect("valid id");
    let err = service(executor, &session)
        .get_product(&id)
        .await
        .expect_err("unknown id");
    assert_eq!(err.kind(), ErrorKind::Domain);
    assert_eq!(err.message(), "product not found");
}

#[rstest]
#[tokio::test]
async fn product_id_stays_a_single_path_segment(session: SessionStore) {
    let mut executor = MockRequestExecutor::new();
    executor
        .expect_execute()
        .withf(|request| request.segments() == ["products", "shoe?size=42#x"])
        .times(1)
        .return_once(|_| Ok(json!({ "data": { "product": product_json("shoe?size=42#x") } })));

    let id = ProductId::new("shoe?size=42#x").expect("valid id");
    let product = service(executor, &session)
        .get_product(&id)
        .await
        .expect("product");
    assert_eq!(product.id, id);
    let badge = product.badge.expect("badge decoded");
    assert_eq!(badge.value, "Hit");
}

#[rstest]
#[tokio::test]
async fn invalid_product_payload_is_a_decoding_error(session: SessionStore) {
    let mut executor = MockRequestExecutor::new();
    executor.expect_execute().times(1).return_once(|_| {
        let mut product = product_json("a");
        product["price"] = json!("-3");
        Ok(json!({ "data": { "product": product } }))
    });

    let id = ProductId::new("a").expect("valid id");
    let err = service(executor, &session)
        .get_product(&id)
        .await
        .expect_err("negative price");
    assert_eq!(err.kind(), ErrorKind::Decoding);
}
