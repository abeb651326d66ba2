//! The paid generation endpoint.
//!
//! Flow: authenticate, price the mode, charge the points, call the backend,
//! wrap the result in the SEO envelope. If the backend fails after the
//! charge, a compensating refund is recorded before the error is surfaced.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use growth_points_core::GenerationMode;

use crate::auth::AuthUser;
use crate::charge::{charge_for_feature, refund_charge};
use crate::error::ApiError;
use crate::seo::{build_seo_response, SeoEnvelope};
use crate::state::AppState;

/// Generation request body.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// The prompt to send to the backend.
    pub prompt: String,
    /// Which feature to run.
    pub mode: GenerationMode,
    /// Client-supplied idempotency key for the charge.
    pub request_id: Option<String>,
}

/// Generate content, debiting the caller's points first.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<SeoEnvelope>, ApiError> {
    let prompt = body.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::InvalidArgument("missing prompt".into()));
    }

    // Refuse before charging when the paid action cannot possibly run.
    let generator = state
        .generator
        .as_ref()
        .ok_or_else(|| ApiError::Upstream("generation backend not configured".into()))?;

    let cost = state.config.pricing.cost(body.mode);
    let receipt = charge_for_feature(
        state.store.as_ref(),
        &auth.user_id,
        cost,
        serde_json::json!({
            "module": body.mode.module(),
            "mode": body.mode.as_str(),
            "prompt": prompt,
        }),
        body.request_id.as_deref(),
    )?;

    let generated = match generator.generate(prompt, body.mode).await {
        Ok(generated) => generated,
        Err(err) => {
            // Debit-first policy: compensate with an explicit refund.
            if let Err(refund_err) =
                refund_charge(state.store.as_ref(), &auth.user_id, &receipt, &err.to_string())
            {
                tracing::error!(
                    user_id = %auth.user_id,
                    transaction_id = %receipt.transaction_id,
                    error = %refund_err,
                    "Refund failed after backend error, manual reconciliation needed"
                );
            }
            return Err(ApiError::Upstream(err.to_string()));
        }
    };

    tracing::info!(
        user_id = %auth.user_id,
        mode = %body.mode,
        cost = %cost,
        balance = %receipt.points,
        "Generation completed"
    );

    let (payload_key, title, keywords) = presentation(body.mode);
    let payload = serde_json::json!({
        payload_key: generated.content,
        "spent": cost,
        "points": receipt.points,
    });
    let description = format!("AI-generated {} content: {}", body.mode, truncate(prompt, 60));
    let keywords = keywords.iter().map(ToString::to_string).collect();

    Ok(Json(build_seo_response(
        Some(payload),
        title,
        keywords,
        &description,
    )))
}

/// Per-mode payload key, page title, and keyword set.
const fn presentation(mode: GenerationMode) -> (&'static str, &'static str, &'static [&'static str]) {
    match mode {
        GenerationMode::Text => (
            "generated_text",
            "AI Article Generation | Smart Insights",
            &["AI content generation", "AEO", "brand content"],
        ),
        GenerationMode::Image => (
            "image",
            "AI Image Generation | Creative Studio",
            &["AI image generation", "visual content", "brand creative"],
        ),
        GenerationMode::Code => (
            "generated_code",
            "AI Code Generation | Content Assistant",
            &["AI code generation", "developer tools", "automation"],
        ),
        GenerationMode::Speech => (
            "audio",
            "AI Speech Synthesis | Multimedia Hub",
            &["AI speech synthesis", "audio content", "multimedia"],
        ),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
