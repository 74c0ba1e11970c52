//! Loyalty operations.
//!
//! Points calculation, badge awards, and challenge accounting are all
//! gateway procedures. The points read is a soft read: a user with no
//! loyalty record - or a degraded gateway - gets a success-shaped empty
//! standing, indistinguishable from a fresh account.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use harvestly_core::{Challenge, LoyaltyStatus};

use crate::error::{AppError, Result};
use crate::gateway::TableQuery;

use super::validate::{require_max_len, require_non_empty};
use super::{AuthTier, OpContext, OperationDef, ValidateInput, decode_rows, decode_value};

const MAX_REWARD_ID_LEN: usize = 100;

pub(super) fn operations() -> Vec<OperationDef> {
    vec![
        OperationDef::query("loyalty.getPoints", AuthTier::Protected, get_points),
        OperationDef::query("loyalty.getChallenges", AuthTier::Public, get_challenges),
        OperationDef::mutation("loyalty.redeemReward", AuthTier::Protected, redeem_reward),
    ]
}

// =============================================================================
// loyalty.getPoints (soft read)
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GetPointsInput {}

impl ValidateInput for GetPointsInput {}

/// Loyalty standing in the success envelope the app expects.
#[derive(Debug, Serialize)]
pub struct LoyaltyPointsResult {
    pub success: bool,
    #[serde(flatten)]
    pub status: LoyaltyStatus,
}

#[instrument(skip(ctx, _input))]
async fn get_points(ctx: OpContext, _input: GetPointsInput) -> Result<LoyaltyPointsResult> {
    let user_id = ctx.user_id()?;

    let result = ctx
        .gateway
        .call_procedure("get_loyalty_status", json!({ "user_id": user_id }))
        .await;

    let status = match result {
        // A user without a loyalty record comes back as null
        Ok(Value::Null) => LoyaltyStatus::default(),
        Ok(value) => match decode_value::<LoyaltyStatus>(value, "get_loyalty_status") {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "Loyalty status unreadable; returning empty standing");
                LoyaltyStatus::default()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Loyalty read failed; returning empty standing");
            LoyaltyStatus::default()
        }
    };

    Ok(LoyaltyPointsResult {
        success: true,
        status,
    })
}

// =============================================================================
// loyalty.getChallenges
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GetChallengesInput {}

impl ValidateInput for GetChallengesInput {}

#[instrument(skip(ctx, _input))]
async fn get_challenges(ctx: OpContext, _input: GetChallengesInput) -> Result<Vec<Challenge>> {
    let rows = ctx
        .gateway
        .query_table(
            "challenges",
            TableQuery::new().eq("active", "true").order("title.asc"),
        )
        .await
        .map_err(|e| AppError::gateway("failed to load challenges", e))?;

    decode_rows(rows, "challenges")
}

// =============================================================================
// loyalty.redeemReward
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRewardInput {
    pub reward_id: String,
}

impl ValidateInput for RedeemRewardInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("rewardId", &self.reward_id)?;
        require_max_len("rewardId", &self.reward_id, MAX_REWARD_ID_LEN)
    }
}

/// Redeem a reward. The `redeem_reward` procedure owns eligibility and the
/// points deduction; its JSON result is passed through unchanged.
#[instrument(skip(ctx), fields(reward_id = %input.reward_id))]
async fn redeem_reward(ctx: OpContext, input: RedeemRewardInput) -> Result<Value> {
    let user_id = ctx.user_id()?;

    ctx.gateway
        .call_procedure(
            "redeem_reward",
            json!({ "user_id": user_id, "reward_id": input.reward_id }),
        )
        .await
        .map_err(|e| AppError::gateway("reward redemption failed", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeem_reward_input_bounds() {
        assert!(
            RedeemRewardInput {
                reward_id: "free_delivery".to_string()
            }
            .validate()
            .is_ok()
        );
        assert!(
            RedeemRewardInput {
                reward_id: String::new()
            }
            .validate()
            .is_err()
        );
        assert!(
            RedeemRewardInput {
                reward_id: "x".repeat(101)
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_points_result_shape_matches_empty_standing() {
        let result = LoyaltyPointsResult {
            success: true,
            status: LoyaltyStatus::default(),
        };
        let json = serde_json::to_value(result).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "points": 0,
                "badges": [],
                "challenges": []
            })
        );
    }
}
