//! Request and response types mirroring the growth-points API.

use serde::{Deserialize, Serialize};

/// Balance response.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    /// Current points balance.
    pub points: i64,
}

/// Charge request.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    /// Points to debit; must be positive.
    pub cost: i64,
    /// Annotation stored with the transaction.
    #[serde(default)]
    pub meta: serde_json::Value,
    /// Client-supplied idempotency key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Charge response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeResponse {
    /// The recorded spend transaction.
    pub transaction_id: String,
    /// Points debited.
    pub cost: i64,
    /// Balance after the debit.
    pub points: i64,
}

/// Grant request (service-to-service).
#[derive(Debug, Clone, Serialize)]
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
#[derive(Debug, Clone, Deserialize)]
pub struct GrantResponse {
    /// The recorded earn transaction.
    pub transaction_id: String,
    /// Balance after the grant.
    pub points: i64,
}

/// Referral response.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferralResponse {
    /// Points granted to the inviter.
    pub inviter_reward: i64,
    /// Points granted to the invitee.
    pub invitee_reward: i64,
}

/// Error response envelope from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// The error body.
    pub error: ApiErrorBody,
}

/// Error body from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Structured detail, when present.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
