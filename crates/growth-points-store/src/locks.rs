//! Per-account mutual exclusion.
//!
//! The balance guard: all mutations for one account run under that account's
//! mutex, so read-check-write is a single atomic unit and two racing charges
//! cannot both pass the balance check. Different accounts map to different
//! mutexes (and different `DashMap` shards), so they never contend.

use std::sync::Arc;

use dashmap::DashMap;
use growth_points_core::UserId;
use parking_lot::Mutex;

/// Registry of per-account mutexes.
///
/// Lock entries are created on first use and kept for the lifetime of the
/// store; the per-account footprint is one `Arc<Mutex<()>>`.
#[derive(Default)]
pub struct AccountLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl AccountLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the mutex for an account, creating it on first use.
    ///
    /// The caller holds the returned `Arc` and locks it; the registry's own
    /// shard lock is only held for the lookup.
    #[must_use]
    pub fn acquire(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.clone())
            .or_default()
            .value()
            .clone()
    }
}
