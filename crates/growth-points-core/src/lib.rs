//! Core types for the growth-points ledger.
//!
//! This crate defines the domain model shared by the store, service, and
//! client crates:
//!
//! - [`UserId`] / [`TransactionId`] - strongly-typed identifiers
//! - [`Account`] - per-user points balance
//! - [`PointsTransaction`] - immutable, append-only balance changes
//! - [`PricingConfig`] / [`GenerationMode`] - point costs per feature
//! - [`RewardConfig`] - referral reward ranges
//!
//! No I/O happens here; persistence lives in `growth-points-store`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod ids;
pub mod pricing;
pub mod reward;
pub mod transaction;

pub use account::Account;
pub use ids::{IdError, TransactionId, UserId};
pub use pricing::{GenerationMode, PricingConfig};
pub use reward::{ReferralRewards, RewardConfig};
pub use transaction::{PointsTransaction, TransactionKind};
