//! Account types for the growth-points ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A points account for a user.
///
/// Accounts are created implicitly by the store on the first points operation
/// (get-or-create) and are never deleted. The `points` balance is only ever
/// mutated through the store's atomic primitives, and stays non-negative at
/// all externally observable times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// The owning user.
    pub user_id: UserId,

    /// Current points balance. Invariant: `points >= 0`.
    pub points: i64,

    /// Total points ever earned.
    pub lifetime_earned: i64,

    /// Total points ever spent (non-negative).
    pub lifetime_spent: i64,

    /// When the last balance-affecting operation happened.
    pub last_active_at: DateTime<Utc>,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with zero balance.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            points: 0,
            lifetime_earned: 0,
            lifetime_spent: 0,
            last_active_at: now,
            created_at: now,
        }
    }

    /// Check whether the account can afford a charge.
    #[must_use]
    pub const fn has_sufficient_points(&self, cost: i64) -> bool {
        self.points >= cost
    }
}
