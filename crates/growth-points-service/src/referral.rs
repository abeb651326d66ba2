//! The referral reward engine.
//!
//! A successful referral grants both parties a randomized `earn`: the
//! inviter and the invitee each draw from their configured range. The two
//! grants hit different accounts, so they cannot share one atomic write;
//! instead, a failure after the first grant is reported as a distinct
//! partial-failure outcome that operators can reconcile, never silently
//! swallowed.

use rand::Rng;

use growth_points_core::{ReferralRewards, RewardConfig, TransactionId, UserId};
use growth_points_store::{Store, StoreError};

/// Result of a fully applied referral.
#[derive(Debug, Clone)]
pub struct ReferralOutcome {
    /// The drawn rewards.
    pub rewards: ReferralRewards,
    /// The inviter's earn transaction.
    pub inviter_tx: TransactionId,
    /// The invitee's earn transaction.
    pub invitee_tx: TransactionId,
}

/// Ways a referral can fail.
#[derive(Debug, thiserror::Error)]
pub enum ReferralError {
    /// Inviter and invitee are the same user.
    #[error("inviter and invitee must be distinct")]
    SelfReferral,

    /// The first grant failed; nothing was applied.
    #[error("referral not applied: {0}")]
    Store(#[from] StoreError),

    /// The first grant landed, the second did not.
    #[error("partial referral: {rewarded} rewarded {amount}, {failed} not rewarded")]
    Partial {
        /// The user whose reward was applied.
        rewarded: UserId,
        /// Points already granted.
        amount: i64,
        /// The user whose reward failed.
        failed: UserId,
        /// The underlying store failure.
        source: StoreError,
    },
}

/// Grant both referral rewards.
///
/// The RNG is injected so tests can drive the draw deterministically.
///
/// # Errors
///
/// See [`ReferralError`]; a [`ReferralError::Partial`] means the inviter's
/// grant is durable and the invitee's is not.
pub fn reward_referral<R: Rng + ?Sized>(
    store: &dyn Store,
    config: &RewardConfig,
    rng: &mut R,
    inviter_id: &UserId,
    invitee_id: &UserId,
) -> Result<ReferralOutcome, ReferralError> {
    if inviter_id == invitee_id {
        return Err(ReferralError::SelfReferral);
    }

    let rewards = config.draw(rng);

    let inviter_tx = store.record(
        inviter_id,
        rewards.inviter_reward,
        serde_json::json!({
            "module": "referral",
            "role": "inviter",
            "invitee": invitee_id.to_string(),
        }),
    )?;

    let invitee_tx = store
        .record(
            invitee_id,
            rewards.invitee_reward,
            serde_json::json!({
                "module": "referral",
                "role": "invitee",
                "inviter": inviter_id.to_string(),
            }),
        )
        .map_err(|source| ReferralError::Partial {
            rewarded: inviter_id.clone(),
            amount: rewards.inviter_reward,
            failed: invitee_id.clone(),
            source,
        })?;

    tracing::info!(
        inviter = %inviter_id,
        invitee = %invitee_id,
        inviter_reward = %rewards.inviter_reward,
        invitee_reward = %rewards.invitee_reward,
        "Referral rewards granted"
    );

    Ok(ReferralOutcome {
        rewards,
        inviter_tx: inviter_tx.id,
        invitee_tx: invitee_tx.id,
    })
}
