//! Points transactions.
//!
//! Every balance change is recorded as an immutable transaction; the ledger
//! is append-only and an account's balance always equals the sum of its
//! transaction amounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{TransactionId, UserId};

/// An immutable record of a single balance change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsTransaction {
    /// Unique transaction id (ULID, time-ordered).
    pub id: TransactionId,

    /// The account this transaction belongs to.
    pub user_id: UserId,

    /// Earn or spend.
    pub kind: TransactionKind,

    /// Signed amount: positive for earn, negative for spend.
    pub amount: i64,

    /// Account balance immediately after this transaction was applied.
    pub balance_after: i64,

    /// Opaque annotation: which feature triggered it, the prompt, a request
    /// id, a refund reason.
    pub meta: serde_json::Value,

    /// When the transaction was created. Non-decreasing per account in
    /// insertion order.
    pub created_at: DateTime<Utc>,
}

impl PointsTransaction {
    /// Create an `earn` transaction. The stored amount is always positive.
    #[must_use]
    pub fn earn(user_id: UserId, amount: i64, balance_after: i64, meta: serde_json::Value) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            kind: TransactionKind::Earn,
            amount: amount.abs(),
            balance_after,
            meta,
            created_at: Utc::now(),
        }
    }

    /// Create a `spend` transaction. The stored amount is always negative.
    #[must_use]
    pub fn spend(user_id: UserId, cost: i64, balance_after: i64, meta: serde_json::Value) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            kind: TransactionKind::Spend,
            amount: -cost.abs(),
            balance_after,
            meta,
            created_at: Utc::now(),
        }
    }
}

/// The direction of a balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Points added: grants, referral rewards, refunds.
    Earn,

    /// Points deducted for a paid feature.
    Spend,
}

impl TransactionKind {
    /// The wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Earn => "earn",
            Self::Spend => "spend",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earn_amount_is_positive() {
        let tx = PointsTransaction::earn(
            UserId::generate(),
            20,
            20,
            serde_json::json!({"module": "referral"}),
        );
        assert_eq!(tx.kind, TransactionKind::Earn);
        assert_eq!(tx.amount, 20);
        assert_eq!(tx.balance_after, 20);
    }

    #[test]
    fn spend_amount_is_negative() {
        let tx = PointsTransaction::spend(
            UserId::generate(),
            10,
            5,
            serde_json::json!({"module": "smart_insights"}),
        );
        assert_eq!(tx.kind, TransactionKind::Spend);
        assert_eq!(tx.amount, -10);
        assert_eq!(tx.balance_after, 5);
    }

    #[test]
    fn kind_wire_names() {
        assert_eq!(TransactionKind::Earn.as_str(), "earn");
        assert_eq!(TransactionKind::Spend.as_str(), "spend");
    }

    #[test]
    fn transaction_serde_roundtrip() {
        let tx = PointsTransaction::spend(UserId::generate(), 5, 0, serde_json::Value::Null);
        let json = serde_json::to_string(&tx).unwrap();
        let parsed: PointsTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, tx.id);
        assert_eq!(parsed.amount, -5);
        assert_eq!(parsed.kind, TransactionKind::Spend);
    }
}
