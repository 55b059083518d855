//! End-to-end HTTP tests over the in-memory backend.
//!
//! These exercise the full wire contract: camelCase JSON bodies, status
//! codes, the creation rules, and the query filters.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use invoicebook::core::InvoiceService;
use invoicebook::server::{AppState, build_router};
use invoicebook::storage::InMemoryInvoiceStore;

fn test_server() -> TestServer {
    let store = Arc::new(InMemoryInvoiceStore::new());
    let state = AppState::new(InvoiceService::new(store));
    TestServer::new(build_router(state))
}

async fn post_invoice(server: &TestServer, number: &str, date: &str, amount: f64) -> StatusCode {
    server
        .post("/invoice")
        .json(&json!({
            "invoiceDate": date,
            "invoiceNumber": number,
            "invoiceAmount": amount,
        }))
        .await
        .status_code()
}

#[tokio::test]
async fn health_check_responds_ok() {
    let server = test_server();
    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_returns_success_message() {
    let server = test_server();
    let response = server
        .post("/invoice")
        .json(&json!({
            "invoiceDate": "2023-05-10",
            "invoiceNumber": "INV-1",
            "invoiceAmount": 250.0,
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invoice saved successfully");
}

#[tokio::test]
async fn created_invoice_carries_derived_financial_year() {
    let server = test_server();
    assert_eq!(
        post_invoice(&server, "INV-1", "2023-05-10", 250.0).await,
        StatusCode::OK
    );

    let invoices: Vec<Value> = server.get("/invoices").await.json();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["invoiceNumber"], "INV-1");
    assert_eq!(invoices[0]["invoiceDate"], "2023-05-10");
    assert_eq!(invoices[0]["invoiceAmount"], 250.0);
    assert_eq!(invoices[0]["financialYear"], "2023-24");
}

#[tokio::test]
async fn duplicate_number_in_same_financial_year_is_rejected() {
    let server = test_server();
    assert_eq!(
        post_invoice(&server, "INV-1", "2023-01-10", 100.0).await,
        StatusCode::OK
    );

    let response = server
        .post("/invoice")
        .json(&json!({
            "invoiceDate": "2023-06-01",
            "invoiceNumber": "INV-1",
            "invoiceAmount": 100.0,
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let message = body["message"].as_str().unwrap();
    // One combined reason, not distinguishing which rule failed.
    assert!(message.contains("already used"));
    assert!(message.contains("invalid invoice date"));
}

#[tokio::test]
async fn same_number_in_later_financial_year_is_accepted() {
    let server = test_server();
    assert_eq!(
        post_invoice(&server, "INV-1", "2022-05-01", 100.0).await,
        StatusCode::OK
    );
    // Different derived year, later date: both rules pass.
    assert_eq!(
        post_invoice(&server, "INV-1", "2023-05-01", 100.0).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn brand_new_number_succeeds_regardless_of_date() {
    let server = test_server();
    assert_eq!(
        post_invoice(&server, "INV-1", "2023-06-01", 100.0).await,
        StatusCode::OK
    );
    // Earlier than everything already stored, but a first for its number.
    assert_eq!(
        post_invoice(&server, "INV-2", "2020-01-01", 50.0).await,
        StatusCode::OK
    );
}

// Fixture for the chronological-slot cases: invoice "A" at 2023-12-20 and an
// unrelated invoice "B" at 2024-03-01. Candidate dates for "A" sit in the
// 2024-25 financial year so the uniqueness rule stays out of the way and the
// outcome is decided by the slot rule alone.
async fn seed_slot_fixture(server: &TestServer) {
    assert_eq!(
        post_invoice(server, "A", "2023-12-20", 100.0).await,
        StatusCode::OK
    );
    assert_eq!(
        post_invoice(server, "B", "2024-03-01", 100.0).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn date_between_previous_and_next_is_accepted() {
    let server = test_server();
    seed_slot_fixture(&server).await;
    assert_eq!(
        post_invoice(&server, "A", "2024-02-15", 100.0).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn date_after_globally_next_invoice_is_rejected() {
    // The upper bound comes from the next-dated invoice anywhere in the
    // store — here invoice "B", a different number. Documented current
    // behavior of the slot rule.
    let server = test_server();
    seed_slot_fixture(&server).await;
    assert_eq!(
        post_invoice(&server, "A", "2024-04-01", 100.0).await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn date_before_previous_invoice_is_rejected() {
    let server = test_server();
    seed_slot_fixture(&server).await;
    // 2022-06-01 derives a free financial year, so only the slot rule fires.
    assert_eq!(
        post_invoice(&server, "A", "2022-06-01", 100.0).await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn date_equal_to_previous_is_rejected() {
    let server = test_server();
    seed_slot_fixture(&server).await;
    assert_eq!(
        post_invoice(&server, "A", "2023-12-20", 100.0).await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn with_no_next_any_later_date_is_accepted() {
    let server = test_server();
    assert_eq!(
        post_invoice(&server, "A", "2023-01-10", 100.0).await,
        StatusCode::OK
    );
    // "A" is the latest-dated invoice in the store; year differs so
    // uniqueness passes and only "later than previous" applies.
    assert_eq!(
        post_invoice(&server, "A", "2024-12-31", 100.0).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn query_without_filters_returns_all() {
    let server = test_server();
    post_invoice(&server, "INV-1", "2022-05-01", 100.0).await;
    post_invoice(&server, "INV-2", "2023-05-01", 200.0).await;

    let invoices: Vec<Value> = server.get("/invoices").await.json();
    assert_eq!(invoices.len(), 2);
}

#[tokio::test]
async fn query_on_empty_store_returns_empty_array() {
    let server = test_server();
    let response = server.get("/invoices").await;
    response.assert_status(StatusCode::OK);
    let invoices: Vec<Value> = response.json();
    assert!(invoices.is_empty());
}

#[tokio::test]
async fn query_by_financial_year_returns_exact_subset() {
    let server = test_server();
    post_invoice(&server, "INV-1", "2022-05-01", 100.0).await;
    post_invoice(&server, "INV-2", "2023-05-01", 200.0).await;
    post_invoice(&server, "INV-3", "2023-08-01", 300.0).await;

    let invoices: Vec<Value> = server
        .get("/invoices")
        .add_query_param("financialYear", "2023-24")
        .await
        .json();
    assert_eq!(invoices.len(), 2);
    assert!(
        invoices
            .iter()
            .all(|inv| inv["financialYear"] == "2023-24")
    );
}

#[tokio::test]
async fn query_by_invoice_number() {
    let server = test_server();
    post_invoice(&server, "INV-1", "2022-05-01", 100.0).await;
    post_invoice(&server, "INV-2", "2023-05-01", 200.0).await;

    let invoices: Vec<Value> = server
        .get("/invoices")
        .add_query_param("invoiceNumber", "INV-2")
        .await
        .json();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["invoiceNumber"], "INV-2");
}

#[tokio::test]
async fn date_range_filter_is_inclusive() {
    let server = test_server();
    post_invoice(&server, "INV-1", "2023-01-01", 100.0).await;
    post_invoice(&server, "INV-2", "2023-02-15", 200.0).await;
    post_invoice(&server, "INV-3", "2023-03-31", 300.0).await;

    let invoices: Vec<Value> = server
        .get("/invoices")
        .add_query_param("startDate", "2023-01-01")
        .add_query_param("endDate", "2023-02-15")
        .await
        .json();
    assert_eq!(invoices.len(), 2);
}

#[tokio::test]
async fn lone_date_bound_is_ignored() {
    let server = test_server();
    post_invoice(&server, "INV-1", "2023-01-01", 100.0).await;
    post_invoice(&server, "INV-2", "2023-06-01", 200.0).await;

    // startDate without endDate: the range does not apply.
    let invoices: Vec<Value> = server
        .get("/invoices")
        .add_query_param("startDate", "2023-05-01")
        .await
        .json();
    assert_eq!(invoices.len(), 2);
}

#[tokio::test]
async fn empty_query_values_return_all_invoices() {
    let server = test_server();
    post_invoice(&server, "INV-1", "2023-05-10", 250.0).await;

    // A client submitting the filter form untouched sends every parameter
    // with an empty value; that must behave like no filters at all.
    let response = server
        .get("/invoices")
        .add_query_param("financialYear", "")
        .add_query_param("invoiceNumber", "")
        .add_query_param("startDate", "")
        .add_query_param("endDate", "")
        .await;
    response.assert_status(StatusCode::OK);
    let invoices: Vec<Value> = response.json();
    assert_eq!(invoices.len(), 1);

    let response = server
        .get("/invoices")
        .add_query_param("financialYear", "")
        .await;
    response.assert_status(StatusCode::OK);
    let invoices: Vec<Value> = response.json();
    assert_eq!(invoices.len(), 1);
}

#[tokio::test]
async fn put_replaces_date_and_amount() {
    let server = test_server();
    post_invoice(&server, "INV-1", "2023-05-10", 250.0).await;

    let response = server
        .put("/invoices/INV-1")
        .json(&json!({
            "invoiceDate": "2023-07-01",
            "invoiceAmount": 400.0,
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["invoiceDate"], "2023-07-01");
    assert_eq!(updated["invoiceAmount"], 400.0);
    // Number and derived year are untouched.
    assert_eq!(updated["invoiceNumber"], "INV-1");
    assert_eq!(updated["financialYear"], "2023-24");
}

#[tokio::test]
async fn put_does_not_rerun_validation() {
    let server = test_server();
    post_invoice(&server, "A", "2023-01-10", 100.0).await;
    post_invoice(&server, "B", "2023-03-01", 100.0).await;

    // 2023-04-01 would be rejected at creation; update accepts it.
    let response = server
        .put("/invoices/A")
        .json(&json!({
            "invoiceDate": "2023-04-01",
            "invoiceAmount": 100.0,
        }))
        .await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn put_unknown_number_returns_404() {
    let server = test_server();
    let response = server
        .put("/invoices/NOPE")
        .json(&json!({
            "invoiceDate": "2023-07-01",
            "invoiceAmount": 400.0,
        }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_confirmation() {
    let server = test_server();
    post_invoice(&server, "INV-1", "2023-05-10", 250.0).await;

    let response = server.delete("/invoices/INV-1").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invoice deleted successfully");

    let remaining: Vec<Value> = server.get("/invoices").await.json();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn delete_unknown_number_returns_404_not_500() {
    let server = test_server();
    let response = server.delete("/invoices/NOPE").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let server = test_server();
    let response = server
        .post("/invoice")
        .json(&json!({
            "invoiceDate": "not-a-date",
            "invoiceNumber": "INV-1",
            "invoiceAmount": 100.0,
        }))
        .await;
    assert!(response.status_code().is_client_error());
}
