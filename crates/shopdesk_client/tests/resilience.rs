//! End-to-end behavior of the resilient client over in-memory stores.

use serde_json::{json, Value};
use shopdesk_client::{
    ClientConfig, Credentials, DataClient, Envelope, Params, ResilientClient, Row,
};
use shopdesk_store::{AccessPolicy, MemoryStore};
use std::sync::Arc;

fn row(value: Value) -> Row {
    value.as_object().cloned().unwrap()
}

fn primary() -> Arc<MemoryStore> {
    let store = MemoryStore::new()
        .with_policy("orders", AccessPolicy::AuthenticatedOnly)
        .with_policy("payroll", AccessPolicy::Deny);
    store
        .seed(
            "products",
            vec![
                row(json!({"id": "p1", "name": "Soap", "business_id": "B1"})),
                row(json!({"id": "p2", "name": "Rice", "business_id": "B1"})),
                row(json!({"id": "p3", "name": "Oil", "business_id": "B2"})),
            ],
        )
        .unwrap();
    store
        .seed(
            "orders",
            vec![row(json!({"id": "o1", "business_id": "B1", "total_amount": 40}))],
        )
        .unwrap();
    store
        .seed(
            "profiles",
            vec![row(json!({"id": "u1", "email": "owner@shop.test", "business_id": "B1"}))],
        )
        .unwrap();
    Arc::new(store)
}

fn fallback() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store
        .seed(
            "orders",
            vec![
                row(json!({"id": "demo-1", "business_id": "B1", "total_amount": 10})),
                row(json!({"id": "demo-2", "business_id": "B2", "total_amount": 20})),
            ],
        )
        .unwrap();
    Arc::new(store)
}

fn api() -> ResilientClient {
    ResilientClient::new(DataClient::new(primary())).with_fallback(fallback())
}

#[tokio::test]
async fn scenario_a_business_scoped_read() {
    let result = api()
        .get("/products", &Params::new().with("business_id", "B1"))
        .await;
    let names: Vec<_> = result
        .data
        .unwrap()
        .into_iter()
        .map(|r| r["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Soap"), json!("Rice")]);
}

#[tokio::test]
async fn scenario_b_create_then_read() {
    let api = api();
    let created = api
        .create("/customers", json!({"name": "Alice", "business_id": "B1"}))
        .await;
    assert!(created.is_ok());

    let customers = api
        .get("/customers", &Params::new().with("business_id", "B1"))
        .await;
    let customers = customers.data.unwrap();
    assert!(customers.iter().any(|c| c["name"] == json!("Alice")));
}

#[tokio::test]
async fn scenario_c_restricted_read_without_fallback_data() {
    let result = api().get("/payroll", &Params::new()).await;
    assert!(result.data.is_none());
    assert!(!result.is_mock);
    let error = result.error.unwrap();
    assert!(error.is_rls);
    assert!(error.message.starts_with("Permission denied"));
    assert_eq!(error.code.as_deref(), Some("42501"));
}

#[tokio::test]
async fn restricted_read_falls_back_to_mock_rows() {
    let result = api()
        .get("/orders", &Params::new().with("business_id", "B1"))
        .await;
    assert!(result.error.is_none());
    assert!(result.is_mock);
    let rows = result.data.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], json!("demo-1"));
}

#[tokio::test]
async fn fallback_can_be_disabled() {
    let api = ResilientClient::new(DataClient::with_config(
        primary(),
        ClientConfig::new().fallback_reads(false),
    ))
    .with_fallback(fallback());
    let result = api.get("/orders", &Params::new()).await;
    assert!(result.error.unwrap().is_rls);
}

#[tokio::test]
async fn single_row_fallback_needs_exactly_one_row() {
    let api = api();
    let one = api
        .get_one("/orders", &Params::new().with("id", "demo-2"))
        .await;
    assert!(one.is_mock);
    assert_eq!(one.data.unwrap()["total_amount"], json!(20));

    let many = api.get_one("/orders", &Params::new()).await;
    assert!(many.error.unwrap().is_rls);
}

#[tokio::test]
async fn restricted_write_never_falls_back() {
    let api = api();
    let result = api
        .create("/orders", json!({"business_id": "B1", "total_amount": 5}))
        .await;
    assert!(result.data.is_none());
    assert!(!result.is_mock);
    assert!(result.error.unwrap().is_rls);
}

#[tokio::test]
async fn signed_in_reads_hit_primary() {
    let api = api();
    api.client()
        .auth()
        .sign_in_with_password(&Credentials::new("owner@shop.test", "irrelevant"))
        .await;

    let result = api.get("/orders", &Params::new()).await;
    assert!(!result.is_mock);
    assert_eq!(result.data.unwrap()[0]["id"], json!("o1"));
}

#[tokio::test]
async fn missing_id_filter_is_not_a_permission_error() {
    let api = api();
    let result = api
        .write("products", |query| query.eq("business_id", "B1").delete())
        .await;
    let error = result.error.unwrap();
    assert!(!error.is_rls);
    assert_eq!(error.code.as_deref(), Some("MISSING_ID_FILTER"));

    let remaining = api.get("/products", &Params::new()).await;
    assert_eq!(remaining.data.unwrap().len(), 3);
}

#[tokio::test]
async fn identical_reads_are_identical() {
    let api = api();
    let read = || api.read("products", |q| q.order("name", true));
    let first: Envelope<Vec<Row>> = read().await;
    let second = read().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_match_is_empty_list() {
    let result = api()
        .get("/products", &Params::new().with("business_id", "nobody"))
        .await;
    assert_eq!(result, Envelope::ok(vec![]));
}
