//! The charge orchestrator.
//!
//! Feature endpoints go through [`charge_for_feature`] before performing the
//! paid action: it validates the cost, runs the atomic check-then-debit in
//! the store, and returns a receipt. If the paid action then fails, the
//! caller records a compensating refund with [`refund_charge`] - the debit
//! itself is never rolled back in place, keeping the ledger append-only.

use growth_points_core::{PointsTransaction, TransactionId, UserId};
use growth_points_store::{Store, StoreError};

use crate::error::ApiError;

/// Proof of a successful charge.
#[derive(Debug, Clone)]
pub struct ChargeReceipt {
    /// The recorded spend transaction.
    pub transaction_id: TransactionId,
    /// Points debited.
    pub cost: i64,
    /// Balance after the debit.
    pub points: i64,
}

/// Charge a user for a paid feature.
///
/// Errors propagate unmodified: `InsufficientPoints` stays distinguishable
/// from validation and store failures so callers can map it to the right
/// user-facing response.
pub fn charge_for_feature(
    store: &dyn Store,
    user_id: &UserId,
    cost: i64,
    meta: serde_json::Value,
    request_id: Option<&str>,
) -> Result<ChargeReceipt, ApiError> {
    if cost <= 0 {
        return Err(ApiError::InvalidArgument("cost must be positive".into()));
    }

    let transaction = store.try_charge(user_id, cost, meta, request_id)?;

    tracing::info!(
        user_id = %user_id,
        cost = %cost,
        balance = %transaction.balance_after,
        transaction_id = %transaction.id,
        "Points charged"
    );

    Ok(ChargeReceipt {
        transaction_id: transaction.id,
        cost,
        points: transaction.balance_after,
    })
}

/// Record a compensating refund for a charge whose paid action failed.
///
/// The refund is an explicit `earn` transaction referencing the original
/// charge, so the audit trail shows both sides.
///
/// # Errors
///
/// Returns the store error if the refund itself cannot be recorded; callers
/// log it and still surface the original failure.
pub fn refund_charge(
    store: &dyn Store,
    user_id: &UserId,
    receipt: &ChargeReceipt,
    reason: &str,
) -> Result<PointsTransaction, StoreError> {
    store.record(
        user_id,
        receipt.cost,
        serde_json::json!({
            "reason": "refund",
            "refunds": receipt.transaction_id.to_string(),
            "detail": reason,
        }),
    )
}
