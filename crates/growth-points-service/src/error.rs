//! API error types and responses.
//!
//! `ApiError` is the closed set of failures the API can surface. Internal
//! detail (database messages, backend error strings) is logged but never
//! echoed to clients verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request - invalid input (non-positive cost, empty referral ids,
    /// missing prompt).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The balance cannot cover the requested charge.
    #[error("insufficient points: balance={balance}, required={required}")]
    InsufficientPoints {
        /// Current balance.
        balance: i64,
        /// Points the operation needed.
        required: i64,
    },

    /// A charge with this request id was already processed.
    #[error("duplicate request: {request_id}")]
    DuplicateRequest {
        /// The replayed request id.
        request_id: String,
        /// The transaction recorded by the original request.
        transaction_id: String,
    },

    /// One referral reward was applied, the other was not.
    #[error("partial referral failure: {rewarded} rewarded, {failed} failed")]
    PartialReferralFailure {
        /// The user whose reward was applied.
        rewarded: String,
        /// The user whose reward failed.
        failed: String,
    },

    /// Durable store I/O failure; safe for the caller to retry.
    #[error("store unavailable")]
    StoreUnavailable,

    /// The generation backend failed or is not configured.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::InvalidArgument(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_argument",
                msg.clone(),
                None,
            ),
            Self::InsufficientPoints { balance, required } => (
                StatusCode::PAYMENT_REQUIRED,
                "insufficient_points",
                self.to_string(),
                Some(serde_json::json!({
                    "balance": balance,
                    "required": required
                })),
            ),
            Self::DuplicateRequest {
                request_id,
                transaction_id,
            } => (
                StatusCode::CONFLICT,
                "duplicate_request",
                format!("Request {request_id} already processed"),
                Some(serde_json::json!({ "transaction_id": transaction_id })),
            ),
            Self::PartialReferralFailure { rewarded, failed } => {
                tracing::error!(
                    rewarded = %rewarded,
                    failed = %failed,
                    "Partial referral failure, manual reconciliation needed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "partial_referral_failure",
                    "Referral partially applied".to_string(),
                    Some(serde_json::json!({
                        "rewarded": rewarded,
                        "failed": failed
                    })),
                )
            }
            Self::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "store_unavailable",
                "Ledger temporarily unavailable, retry later".to_string(),
                None,
            ),
            Self::Upstream(msg) => {
                tracing::warn!(error = %msg, "Generation backend error");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    "Generation backend failed".to_string(),
                    None,
                )
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<growth_points_store::StoreError> for ApiError {
    fn from(err: growth_points_store::StoreError) -> Self {
        use growth_points_store::StoreError;
        match err {
            StoreError::InvalidAmount => Self::InvalidArgument("invalid amount".into()),
            StoreError::InsufficientPoints { balance, required } => {
                Self::InsufficientPoints { balance, required }
            }
            StoreError::DuplicateRequest {
                request_id,
                transaction_id,
            } => Self::DuplicateRequest {
                request_id,
                transaction_id: transaction_id.to_string(),
            },
            StoreError::Database(msg) => {
                tracing::error!(error = %msg, "Ledger store failure");
                Self::StoreUnavailable
            }
            StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}
