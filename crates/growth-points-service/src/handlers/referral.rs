//! Referral reward handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use growth_points_core::UserId;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::referral::{reward_referral, ReferralError};
use crate::state::AppState;

/// Referral request body.
#[derive(Debug, Deserialize)]
pub struct ReferralRequest {
    /// The user who sent the invite.
    pub inviter_id: String,
    /// The user who accepted it.
    pub invitee_id: String,
}

/// Referral response.
#[derive(Debug, Serialize)]
pub struct ReferralResponse {
    /// Points granted to the inviter.
    pub inviter_reward: i64,
    /// Points granted to the invitee.
    pub invitee_reward: i64,
}

/// Grant referral rewards to both parties.
pub async fn refer(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(body): Json<ReferralRequest>,
) -> Result<Json<ReferralResponse>, ApiError> {
    let inviter_id = body
        .inviter_id
        .parse::<UserId>()
        .map_err(|_| ApiError::InvalidArgument("missing or invalid inviter id".into()))?;
    let invitee_id = body
        .invitee_id
        .parse::<UserId>()
        .map_err(|_| ApiError::InvalidArgument("missing or invalid invitee id".into()))?;

    let outcome = {
        let mut rng = rand::thread_rng();
        reward_referral(
            state.store.as_ref(),
            &state.config.rewards,
            &mut rng,
            &inviter_id,
            &invitee_id,
        )
    }
    .map_err(|err| match err {
        ReferralError::SelfReferral => {
            ApiError::InvalidArgument("inviter and invitee must be distinct".into())
        }
        ReferralError::Store(source) => source.into(),
        ReferralError::Partial {
            rewarded, failed, ..
        } => ApiError::PartialReferralFailure {
            rewarded: rewarded.to_string(),
            failed: failed.to_string(),
        },
    })?;

    Ok(Json(ReferralResponse {
        inviter_reward: outcome.rewards.inviter_reward,
        invitee_reward: outcome.rewards.invitee_reward,
    }))
}
