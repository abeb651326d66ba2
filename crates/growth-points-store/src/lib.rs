//! `RocksDB` ledger storage for growth-points.
//!
//! This crate persists accounts and their append-only transaction logs, and
//! enforces the two ledger invariants at the storage boundary:
//!
//! - an account's balance never goes negative;
//! - the balance always equals the sum of the account's transaction amounts.
//!
//! # Architecture
//!
//! Column families:
//!
//! - `accounts`: account records, keyed by `user_id`
//! - `transactions`: transactions, keyed by `transaction_id` (ULID)
//! - `transactions_by_user`: index for listing a user's transactions in time
//!   order
//! - `charge_requests`: processed charge request ids, for idempotent retries
//!
//! Mutations for one account are serialized by a per-account mutex
//! ([`locks::AccountLocks`]) and made durable in a single `WriteBatch`, so
//! check-then-debit is one atomic unit and concurrent charges on the same
//! account cannot overspend. Charges on different accounts do not contend.
//!
//! # Example
//!
//! ```no_run
//! use growth_points_store::{RocksStore, Store};
//! use growth_points_core::UserId;
//!
//! let store = RocksStore::open("/tmp/growth-points-db").unwrap();
//! let user_id = UserId::new("user-1").unwrap();
//!
//! store.record(&user_id, 20, serde_json::json!({"module": "grant"})).unwrap();
//! let tx = store
//!     .try_charge(&user_id, 10, serde_json::json!({"module": "smart_insights"}), None)
//!     .unwrap();
//! assert_eq!(tx.balance_after, 10);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod locks;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use growth_points_core::{Account, PointsTransaction, TransactionId, UserId};

/// The storage trait defining all ledger operations.
///
/// Implementations must make each mutation atomic (transaction record and
/// balance update persist together or not at all) and linearizable per
/// account.
pub trait Store: Send + Sync {
    /// Get an account by user id. `None` if no points operation ever touched
    /// this user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_account(&self, user_id: &UserId) -> Result<Option<Account>>;

    /// Get the current balance for a user, 0 if the account never existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_balance(&self, user_id: &UserId) -> Result<i64> {
        Ok(self.get_account(user_id)?.map_or(0, |a| a.points))
    }

    /// Append a transaction and update the balance atomically, creating the
    /// account on first use.
    ///
    /// Positive `amount` records an `earn`, negative a `spend`. The new
    /// balance is visible to any subsequent read before this returns.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidAmount`] if `amount` is zero.
    /// - [`StoreError::InsufficientPoints`] if a negative `amount` would
    ///   drive the balance below zero.
    fn record(
        &self,
        user_id: &UserId,
        amount: i64,
        meta: serde_json::Value,
    ) -> Result<PointsTransaction>;

    /// Atomically check the balance and record a `spend` of `cost` points.
    ///
    /// Concurrent charges for the same account are serialized: with balance
    /// 10 and two racing charges of 10, exactly one succeeds. `request_id`,
    /// when supplied, makes the charge idempotent per account.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidAmount`] if `cost` is not positive.
    /// - [`StoreError::InsufficientPoints`] if the balance cannot cover
    ///   `cost`.
    /// - [`StoreError::DuplicateRequest`] if `request_id` was already
    ///   processed for this account.
    fn try_charge(
        &self,
        user_id: &UserId,
        cost: i64,
        meta: serde_json::Value,
        request_id: Option<&str>,
    ) -> Result<PointsTransaction>;

    /// Get a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId)
        -> Result<Option<PointsTransaction>>;

    /// List a user's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PointsTransaction>>;
}
