//! Error types for growth-points storage.

use growth_points_core::TransactionId;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed. Retryable by the caller; never retried
    /// silently by the ledger.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Zero amount, or a non-positive charge cost.
    #[error("invalid amount")]
    InvalidAmount,

    /// The balance cannot cover the requested charge.
    #[error("insufficient points: balance={balance}, required={required}")]
    InsufficientPoints {
        /// Current balance.
        balance: i64,
        /// Points the operation needed.
        required: i64,
    },

    /// A charge with this request id was already processed for this account.
    #[error("duplicate request: {request_id}")]
    DuplicateRequest {
        /// The replayed request id.
        request_id: String,
        /// The transaction recorded by the original request.
        transaction_id: TransactionId,
    },
}
