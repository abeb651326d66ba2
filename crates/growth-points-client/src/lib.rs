//! HTTP client SDK for the growth-points service.
//!
//! Used by feature services to check balances, debit points before a paid
//! action, and grant rewards.
//!
//! # Example
//!
//! ```no_run
//! use growth_points_client::{GrowthPointsClient, ChargeRequest};
//!
//! # async fn run() -> Result<(), growth_points_client::ClientError> {
//! let client = GrowthPointsClient::new("http://growth-points:8080", "service-key");
//!
//! let charge = client
//!     .charge(
//!         "user-jwt",
//!         ChargeRequest {
//!             cost: 10,
//!             meta: serde_json::json!({"module": "smart_insights"}),
//!             request_id: Some("req-42".into()),
//!         },
//!     )
//!     .await?;
//! println!("balance after charge: {}", charge.points);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod types;

pub use error::ClientError;
pub use types::{
    ApiErrorResponse, BalanceResponse, ChargeRequest, ChargeResponse, GrantRequest, GrantResponse,
    ReferralResponse,
};

use std::time::Duration;

use reqwest::Client;

/// Growth-points API client.
#[derive(Debug, Clone)]
pub struct GrowthPointsClient {
    client: Client,
    base_url: String,
    api_key: String,
    service_name: String,
}

/// Options for building a [`GrowthPointsClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Value sent in the `x-service-name` header.
    pub service_name: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            service_name: "unknown".into(),
        }
    }
}

impl GrowthPointsClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., `"http://growth-points:8080"`)
    /// * `api_key` - Service API key for service-to-service calls
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_options(base_url, api_key, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            service_name: options.service_name,
        }
    }

    /// Get a user's current balance (requires the user's JWT).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_balance(&self, user_jwt: &str) -> Result<BalanceResponse, ClientError> {
        let url = format!("{}/v1/points/balance", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Debit a user's points before a paid action (requires the user's JWT).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InsufficientPoints`] when the balance cannot
    /// cover the cost, [`ClientError::DuplicateRequest`] on an idempotency
    /// replay, or a generic error otherwise.
    pub async fn charge(
        &self,
        user_jwt: &str,
        request: ChargeRequest,
    ) -> Result<ChargeResponse, ClientError> {
        let url = format!("{}/v1/points/charge", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Grant points to a user (service API key auth).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn grant(&self, request: GrantRequest) -> Result<GrantResponse, ClientError> {
        let url = format!("{}/v1/points/grant", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("x-service-name", &self.service_name)
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Grant referral rewards to an inviter/invitee pair (user JWT auth).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn referral(
        &self,
        user_jwt: &str,
        inviter_id: &str,
        invitee_id: &str,
    ) -> Result<ReferralResponse, ClientError> {
        let url = format!("{}/v1/referral", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .json(&serde_json::json!({
                "inviter_id": inviter_id,
                "invitee_id": invitee_id,
            }))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API responses and convert error envelopes to typed errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        tracing::debug!(status = %status, "growth-points API returned an error");
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let details = api_error.error.details.as_ref();

                match code {
                    "insufficient_points" => {
                        let field = |name: &str| {
                            details
                                .and_then(|d| d.get(name))
                                .and_then(serde_json::Value::as_i64)
                                .unwrap_or(0)
                        };
                        Err(ClientError::InsufficientPoints {
                            balance: field("balance"),
                            required: field("required"),
                        })
                    }
                    "duplicate_request" => Err(ClientError::DuplicateRequest {
                        transaction_id: details
                            .and_then(|d| d.get("transaction_id"))
                            .and_then(serde_json::Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    }),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message: api_error.error.message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}
