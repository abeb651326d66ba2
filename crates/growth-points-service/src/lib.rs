//! Growth-points HTTP API service.
//!
//! This crate provides the HTTP façade over the points ledger:
//!
//! - Points balance and transaction history
//! - Charging points for paid features
//! - Referral rewards for inviter/invitee pairs
//! - The generation endpoint: charge, call the model backend, wrap the
//!   result in an SEO envelope
//!
//! # Authentication
//!
//! Two authentication methods:
//!
//! 1. **User JWT tokens** (HS256, shared secret) - for end-user requests
//! 2. **Service API keys** - for service-to-service requests (grants)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers stay async for route consistency

pub mod auth;
pub mod charge;
pub mod config;
pub mod error;
pub mod generation;
pub mod handlers;
pub mod referral;
pub mod routes;
pub mod seo;
pub mod state;

pub use charge::{charge_for_feature, refund_charge, ChargeReceipt};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use generation::{Generate, GeneratedContent, GenerationError, HttpGenerator};
pub use routes::create_router;
pub use state::AppState;
