//! Points balance, history, charge, and grant handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use growth_points_core::{PointsTransaction, UserId};
use growth_points_store::Store;

use crate::auth::{AuthUser, ServiceAuth};
use crate::charge::charge_for_feature;
use crate::error::ApiError;
use crate::state::AppState;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current points balance.
    pub points: i64,
}

/// Get the caller's current balance.
///
/// Accounts are implicit; a user who never earned or spent points has
/// balance 0, not an error.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let points = state.store.get_balance(&auth.user_id)?;
    Ok(Json(BalanceResponse { points }))
}

/// Transaction list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Maximum number of transactions to return (default: 50, cap: 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// One transaction in a history response.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: String,
    /// `earn` or `spend`.
    pub kind: &'static str,
    /// Signed amount (positive = earn, negative = spend).
    pub amount: i64,
    /// Balance after this transaction.
    pub balance_after: i64,
    /// Annotation recorded with the transaction.
    pub meta: serde_json::Value,
    /// Timestamp (RFC 3339).
    pub created_at: String,
}

impl From<&PointsTransaction> for TransactionResponse {
    fn from(tx: &PointsTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            kind: tx.kind.as_str(),
            amount: tx.amount,
            balance_after: tx.balance_after,
            meta: tx.meta.clone(),
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// Transaction history response.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// Transactions, newest first.
    pub transactions: Vec<TransactionResponse>,
    /// Whether more transactions exist past this page.
    pub has_more: bool,
}

/// List the caller's transaction history.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    // Fetch one more than requested to determine has_more.
    let limit = query.limit.min(100);
    let transactions =
        state
            .store
            .list_transactions_by_user(&auth.user_id, limit + 1, query.offset)?;

    let has_more = transactions.len() > limit;
    let transactions: Vec<_> = transactions
        .iter()
        .take(limit)
        .map(TransactionResponse::from)
        .collect();

    Ok(Json(ListTransactionsResponse {
        transactions,
        has_more,
    }))
}

/// Charge request body.
#[derive(Debug, Deserialize)]
pub struct ChargeRequest {
    /// Points to debit; must be positive.
    pub cost: i64,
    /// Annotation stored with the transaction.
    #[serde(default)]
    pub meta: serde_json::Value,
    /// Client-supplied idempotency key.
    pub request_id: Option<String>,
}

/// Charge response.
#[derive(Debug, Serialize)]
pub struct ChargeResponse {
    /// The recorded spend transaction.
    pub transaction_id: String,
    /// Points debited.
    pub cost: i64,
    /// Balance after the debit.
    pub points: i64,
}

/// Debit the caller's balance.
pub async fn charge(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<ChargeRequest>,
) -> Result<Json<ChargeResponse>, ApiError> {
    let receipt = charge_for_feature(
        state.store.as_ref(),
        &auth.user_id,
        body.cost,
        body.meta,
        body.request_id.as_deref(),
    )?;

    Ok(Json(ChargeResponse {
        transaction_id: receipt.transaction_id.to_string(),
        cost: receipt.cost,
        points: receipt.points,
    }))
}

/// Grant request body (service-to-service).
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    /// The user to credit.
    pub user_id: String,
    /// Points to add; must be positive.
    pub amount: i64,
    /// Annotation stored with the transaction.
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// Grant response.
#[derive(Debug, Serialize)]
pub struct GrantResponse {
    /// The recorded earn transaction.
    pub transaction_id: String,
    /// Balance after the grant.
    pub points: i64,
}

/// Credit a user's balance. Requires the service API key.
pub async fn grant(
    State(state): State<Arc<AppState>>,
    auth: ServiceAuth,
    Json(body): Json<GrantRequest>,
) -> Result<Json<GrantResponse>, ApiError> {
    let user_id = body
        .user_id
        .parse::<UserId>()
        .map_err(|_| ApiError::InvalidArgument("invalid user id".into()))?;
    if body.amount <= 0 {
        return Err(ApiError::InvalidArgument("amount must be positive".into()));
    }

    let transaction = state.store.record(&user_id, body.amount, body.meta)?;

    tracing::info!(
        service = %auth.service_name,
        user_id = %user_id,
        amount = %body.amount,
        balance = %transaction.balance_after,
        "Points granted"
    );

    Ok(Json(GrantResponse {
        transaction_id: transaction.id.to_string(),
        points: transaction.balance_after,
    }))
}
