//! Client error types.

/// Errors that can occur when using the growth-points client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The balance cannot cover the requested charge.
    #[error("insufficient points: balance={balance}, required={required}")]
    InsufficientPoints {
        /// Current balance.
        balance: i64,
        /// Points the operation needed.
        required: i64,
    },

    /// A charge with this request id was already processed.
    #[error("duplicate request, original transaction: {transaction_id}")]
    DuplicateRequest {
        /// The transaction recorded by the original request.
        transaction_id: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
