//! Router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{generate, health, points, referral};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Points (user JWT auth)
/// - `GET /v1/points/balance` - Current balance
/// - `GET /v1/points/transactions` - Transaction history
/// - `POST /v1/points/charge` - Debit points
///
/// ## Grants (service API key auth)
/// - `POST /v1/points/grant` - Credit points
///
/// ## Referral (user JWT auth)
/// - `POST /v1/referral` - Grant referral rewards to inviter and invitee
///
/// ## Generation (user JWT auth)
/// - `POST /v1/generate` - Charge points and generate content
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health::health))
        // Points
        .route("/v1/points/balance", get(points::get_balance))
        .route("/v1/points/transactions", get(points::list_transactions))
        .route("/v1/points/charge", post(points::charge))
        .route("/v1/points/grant", post(points::grant))
        // Referral
        .route("/v1/referral", post(referral::refer))
        // Generation
        .route("/v1/generate", post(generate::generate))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
