//! Points balance, charge, and grant integration tests.

mod common;

use common::{TestHarness, SERVICE_API_KEY};
use growth_points_core::UserId;
use growth_points_store::Store;
use serde_json::json;

// ============================================================================
// Balance
// ============================================================================

#[tokio::test]
async fn balance_is_zero_for_new_user() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/points/balance")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["points"], 0);
}

#[tokio::test]
async fn balance_without_auth_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/points/balance").await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn balance_with_garbage_token_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/points/balance")
        .add_header("authorization", "Bearer not-a-jwt")
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn balance_reflects_grants() {
    let harness = TestHarness::new();
    harness.grant(&harness.test_user_id, 42).await;

    let response = harness
        .server
        .get("/v1/points/balance")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["points"], 42);
}

// ============================================================================
// Grants
// ============================================================================

#[tokio::test]
async fn grant_requires_service_key() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/points/grant")
        .add_header("x-api-key", "wrong-key")
        .json(&json!({"user_id": "u1", "amount": 10}))
        .await;
    response.assert_status_unauthorized();

    let response = harness
        .server
        .post("/v1/points/grant")
        .json(&json!({"user_id": "u1", "amount": 10}))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn grant_rejects_non_positive_amount() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/points/grant")
        .add_header("x-api-key", SERVICE_API_KEY)
        .json(&json!({"user_id": "u1", "amount": 0}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_argument");
}

// ============================================================================
// Charges
// ============================================================================

#[tokio::test]
async fn charge_debits_balance() {
    let harness = TestHarness::new();
    harness.grant(&harness.test_user_id, 20).await;

    let response = harness
        .server
        .post("/v1/points/charge")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"cost": 10, "meta": {"module": "smart_insights"}}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["cost"], 10);
    assert_eq!(body["points"], 10);
    assert!(body["transaction_id"].as_str().is_some());

    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 10);
}

#[tokio::test]
async fn charge_beyond_balance_is_denied_specifically() {
    let harness = TestHarness::new();
    harness.grant(&harness.test_user_id, 10).await;

    let response = harness
        .server
        .post("/v1/points/charge")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"cost": 15}))
        .await;

    response.assert_status(axum::http::StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_points");
    assert_eq!(body["error"]["details"]["balance"], 10);
    assert_eq!(body["error"]["details"]["required"], 15);

    // Balance untouched.
    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 10);
}

#[tokio::test]
async fn charge_rejects_non_positive_cost() {
    let harness = TestHarness::new();

    for cost in [0, -5] {
        let response = harness
            .server
            .post("/v1/points/charge")
            .add_header("authorization", harness.user_auth_header())
            .json(&json!({"cost": cost}))
            .await;

        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "invalid_argument");
    }
}

#[tokio::test]
async fn charge_replay_with_request_id_conflicts() {
    let harness = TestHarness::new();
    harness.grant(&harness.test_user_id, 30).await;

    let request = json!({"cost": 10, "request_id": "req-abc"});

    harness
        .server
        .post("/v1/points/charge")
        .add_header("authorization", harness.user_auth_header())
        .json(&request)
        .await
        .assert_status_ok();

    let replay = harness
        .server
        .post("/v1/points/charge")
        .add_header("authorization", harness.user_auth_header())
        .json(&request)
        .await;

    replay.assert_status(axum::http::StatusCode::CONFLICT);
    let body: serde_json::Value = replay.json();
    assert_eq!(body["error"]["code"], "duplicate_request");
    assert!(body["error"]["details"]["transaction_id"].as_str().is_some());

    // Debited exactly once.
    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 20);
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
async fn transactions_empty_for_new_user() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/points/transactions")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["transactions"].as_array().unwrap().is_empty());
    assert_eq!(body["has_more"], false);
}

#[tokio::test]
async fn transactions_are_newest_first_with_pagination() {
    let harness = TestHarness::new();
    harness.grant(&harness.test_user_id, 20).await;

    harness
        .server
        .post("/v1/points/charge")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({"cost": 5}))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/points/transactions?limit=1&offset=0")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    // Newest first: the spend comes before the grant.
    assert_eq!(transactions[0]["kind"], "spend");
    assert_eq!(transactions[0]["amount"], -5);
    assert_eq!(body["has_more"], true);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn racing_charges_spend_the_balance_once() {
    let harness = TestHarness::new();
    harness.grant(&harness.test_user_id, 10).await;

    let request = json!({"cost": 10});
    let first = async {
        harness
            .server
            .post("/v1/points/charge")
            .add_header("authorization", harness.user_auth_header())
            .json(&request)
            .await
    };
    let second = async {
        harness
            .server
            .post("/v1/points/charge")
            .add_header("authorization", harness.user_auth_header())
            .json(&request)
            .await
    };

    let (a, b) = futures::future::join(first, second).await;

    let codes = [a.status_code(), b.status_code()];
    assert!(codes.contains(&axum::http::StatusCode::OK));
    assert!(codes.contains(&axum::http::StatusCode::PAYMENT_REQUIRED));

    assert_eq!(harness.store.get_balance(&harness.test_user_id).unwrap(), 0);
}

#[tokio::test]
async fn charges_on_different_accounts_do_not_interfere() {
    let harness = TestHarness::new();
    let alice = UserId::new("alice").unwrap();
    let bob = UserId::new("bob").unwrap();
    harness.grant(&alice, 10).await;
    harness.grant(&bob, 10).await;

    let charge_alice = async {
        harness
            .server
            .post("/v1/points/charge")
            .add_header("authorization", TestHarness::auth_header_for(&alice))
            .json(&json!({"cost": 10}))
            .await
    };
    let charge_bob = async {
        harness
            .server
            .post("/v1/points/charge")
            .add_header("authorization", TestHarness::auth_header_for(&bob))
            .json(&json!({"cost": 10}))
            .await
    };

    let (a, b) = futures::future::join(charge_alice, charge_bob).await;
    a.assert_status_ok();
    b.assert_status_ok();

    assert_eq!(harness.store.get_balance(&alice).unwrap(), 0);
    assert_eq!(harness.store.get_balance(&bob).unwrap(), 0);
}
