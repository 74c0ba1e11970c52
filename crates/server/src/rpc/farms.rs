//! Farm operations.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use harvestly_core::{AnalyticsPeriod, Farm, FarmAnalytics, FarmId};

use crate::error::{AppError, Result};
use crate::gateway::TableQuery;

use super::validate::{require_limit, require_max_len, require_non_empty};
use super::{AuthTier, OpContext, OperationDef, ValidateInput, decode_rows, decode_value};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const MAX_REGION_LEN: usize = 100;

pub(super) fn operations() -> Vec<OperationDef> {
    vec![
        OperationDef::query("farms.getById", AuthTier::Public, get_by_id),
        OperationDef::query("farms.list", AuthTier::Public, list),
        OperationDef::query("farms.getAnalytics", AuthTier::Protected, get_analytics),
    ]
}

// =============================================================================
// farms.getById
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFarmInput {
    pub farm_id: FarmId,
}

impl ValidateInput for GetFarmInput {}

/// Look up one farm. An unknown id yields `null`, matching the product
/// lookup convention.
#[instrument(skip(ctx), fields(farm_id = %input.farm_id))]
async fn get_by_id(ctx: OpContext, input: GetFarmInput) -> Result<Option<Farm>> {
    let rows = ctx
        .gateway
        .query_table("farms", TableQuery::new().eq("id", input.farm_id).limit(1))
        .await
        .map_err(|e| AppError::gateway("failed to load farm", e))?;

    let mut farms: Vec<Farm> = decode_rows(rows, "farms")?;
    Ok(farms.pop())
}

// =============================================================================
// farms.list
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListFarmsInput {
    pub region: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ValidateInput for ListFarmsInput {
    fn validate(&self) -> Result<()> {
        if let Some(region) = &self.region {
            require_non_empty("region", region)?;
            require_max_len("region", region, MAX_REGION_LEN)?;
        }
        require_limit("limit", self.limit, MAX_PAGE_SIZE)
    }
}

#[instrument(skip(ctx))]
async fn list(ctx: OpContext, input: ListFarmsInput) -> Result<Vec<Farm>> {
    let mut query = TableQuery::new()
        .order("name.asc")
        .limit(input.limit.unwrap_or(DEFAULT_PAGE_SIZE))
        .offset(input.offset.unwrap_or(0));
    if let Some(region) = &input.region {
        query = query.eq("region", region.trim());
    }

    let rows = ctx
        .gateway
        .query_table("farms", query)
        .await
        .map_err(|e| AppError::gateway("failed to load farms", e))?;

    decode_rows(rows, "farms")
}

// =============================================================================
// farms.getAnalytics (soft read)
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFarmAnalyticsInput {
    pub farm_id: FarmId,
    pub period: AnalyticsPeriod,
}

impl ValidateInput for GetFarmAnalyticsInput {}

/// Dashboard analytics for a farm owner. Degrades to zeroed analytics on
/// gateway failure so the dashboard renders an empty chart rather than an
/// error state.
#[instrument(skip(ctx), fields(farm_id = %input.farm_id))]
async fn get_analytics(ctx: OpContext, input: GetFarmAnalyticsInput) -> Result<FarmAnalytics> {
    let user_id = ctx.user_id()?;

    let result = ctx
        .gateway
        .call_procedure(
            "get_farm_analytics",
            json!({
                "farm_id": input.farm_id,
                "period": input.period,
                "user_id": user_id,
            }),
        )
        .await;

    match result {
        Ok(value) => match decode_value::<FarmAnalytics>(value, "get_farm_analytics") {
            Ok(analytics) => Ok(analytics),
            Err(e) => {
                tracing::warn!(error = %e, "Analytics result unreadable; returning zeroes");
                Ok(FarmAnalytics::default())
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Analytics read failed; returning zeroes");
            Ok(FarmAnalytics::default())
        }
    }
}
