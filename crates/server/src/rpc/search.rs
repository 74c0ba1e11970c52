//! Global search.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use harvestly_core::{Farm, Product};

use crate::error::{AppError, Result};

use super::validate::{require_limit, require_max_len, require_non_empty};
use super::{AuthTier, OpContext, OperationDef, ValidateInput, decode_value};

const DEFAULT_RESULTS: u32 = 20;
const MAX_RESULTS: u32 = 50;
const MAX_QUERY_LEN: usize = 200;

pub(super) fn operations() -> Vec<OperationDef> {
    vec![OperationDef::query(
        "search.global",
        AuthTier::Public,
        global,
    )]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSearchInput {
    pub query: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ValidateInput for GlobalSearchInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("query", &self.query)?;
        require_max_len("query", &self.query, MAX_QUERY_LEN)?;
        require_limit("limit", self.limit, MAX_RESULTS)
    }
}

/// Products and farms matching one query, as returned by the
/// `global_search` procedure.
#[derive(Debug, Serialize, Deserialize)]
pub struct GlobalSearchResult {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub farms: Vec<Farm>,
}

/// Search products and farms in one round trip. Ranking and matching live
/// in the `global_search` procedure.
#[instrument(skip(ctx), fields(query = %input.query))]
async fn global(ctx: OpContext, input: GlobalSearchInput) -> Result<GlobalSearchResult> {
    let result = ctx
        .gateway
        .call_procedure(
            "global_search",
            json!({
                "query": input.query.trim(),
                "limit": input.limit.unwrap_or(DEFAULT_RESULTS),
            }),
        )
        .await
        .map_err(|e| AppError::gateway("search failed", e))?;

    decode_value(result, "global_search")
}
