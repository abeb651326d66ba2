//! Generation endpoint integration tests: charge, backend call, SEO
//! envelope, refund on backend failure.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{FailingGenerator, StubGenerator, TestHarness};
use growth_points_store::Store;
use serde_json::json;

#[tokio::test]
async fn generate_charges_and_wraps_in_seo_envelope() {
    let generator = StubGenerator::new("Ten ways to grow your brand with AI.");
    let harness = TestHarness::with_generator(generator.clone());
    harness.grant(&harness.test_user_id, 20).await;

    let response = harness
        .server
        .post("/v1/generate")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"prompt": "growth marketing article", "mode": "text"}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["status"], "ok");
    assert_eq!(
        body["data"]["generated_text"],
        "Ten ways to grow your brand with AI."
    );
    assert_eq!(body["data"]["spent"], 10);
    assert_eq!(body["data"]["points"], 10);
    assert!(body["seo_analysis"]["seo_score"].as_i64().is_some());
    assert_eq!(body["structured_data"]["@context"], "https://schema.org");

    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 10);
}

#[tokio::test]
async fn image_mode_costs_less_than_text() {
    let generator = StubGenerator::new("https://cdn.example.com/generated.png");
    let harness = TestHarness::with_generator(generator);
    harness.grant(&harness.test_user_id, 20).await;

    let response = harness
        .server
        .post("/v1/generate")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"prompt": "a sunset", "mode": "image"}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["spent"], 5);
    // Image payloads are typed as ImageObject in the structured data.
    assert_eq!(body["structured_data"]["@type"], "ImageObject");
    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 15);
}

#[tokio::test]
async fn insufficient_points_blocks_generation() {
    let generator = StubGenerator::new("never returned");
    let harness = TestHarness::with_generator(generator.clone());
    harness.grant(&harness.test_user_id, 5).await;

    let response = harness
        .server
        .post("/v1/generate")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"prompt": "an essay", "mode": "text"}))
        .await;

    response.assert_status(axum::http::StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_points");

    // The backend was never called and the balance is untouched.
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 5);
}

#[tokio::test]
async fn missing_prompt_is_rejected_before_charge() {
    let generator = StubGenerator::new("unused");
    let harness = TestHarness::with_generator(generator);
    harness.grant(&harness.test_user_id, 20).await;

    let response = harness
        .server
        .post("/v1/generate")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"prompt": "   ", "mode": "text"}))
        .await;

    response.assert_status_bad_request();
    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 20);
}

#[tokio::test]
async fn backend_failure_refunds_the_charge() {
    let harness = TestHarness::with_generator(Arc::new(FailingGenerator));
    harness.grant(&harness.test_user_id, 20).await;

    let response = harness
        .server
        .post("/v1/generate")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"prompt": "an essay", "mode": "text"}))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "upstream_error");
    // Internal backend detail is not echoed to the client.
    assert_eq!(body["error"]["message"], "Generation backend failed");

    // Balance restored through an explicit compensating transaction.
    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 20);
    let transactions = harness
        .store
        .list_transactions_by_user(&harness.test_user_id, 10, 0)
        .unwrap();
    // grant + spend + refund
    assert_eq!(transactions.len(), 3);
    assert_eq!(transactions[0].meta["reason"], "refund");
}

#[tokio::test]
async fn unconfigured_backend_fails_without_charging() {
    let harness = TestHarness::new();
    harness.grant(&harness.test_user_id, 20).await;

    let response = harness
        .server
        .post("/v1/generate")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"prompt": "an essay", "mode": "text"}))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 20);
}

#[tokio::test]
async fn unknown_mode_is_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/generate")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"prompt": "an essay", "mode": "video"}))
        .await;

    // Serde rejects the unknown enum variant at deserialization time.
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}
