//! Product operations.
//!
//! Catalog reads plus the two soft endpoints on the product screen: the
//! live counters and the fire-and-forget view tracker. The
//! frequently-bought-together bundle is the one operation with local
//! arithmetic: the gateway suggests the constituent products, the bundle
//! discount is computed here.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use harvestly_core::{Product, ProductCategory, ProductCounters, ProductId};

use crate::error::{AppError, Result};
use crate::gateway::{TableQuery, TableWrite};

use super::validate::{require_limit, require_max_len, require_non_empty};
use super::{AuthTier, OpContext, OperationDef, ValidateInput, decode_rows};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const MAX_SEARCH_RESULTS: u32 = 50;
const MAX_QUERY_LEN: usize = 200;

/// Discount applied to a frequently-bought-together bundle, in percent.
const BUNDLE_DISCOUNT_PERCENT: i64 = 10;

pub(super) fn operations() -> Vec<OperationDef> {
    vec![
        OperationDef::query("products.getById", AuthTier::Public, get_by_id),
        OperationDef::query("products.list", AuthTier::Public, list),
        OperationDef::query("products.search", AuthTier::Public, search),
        OperationDef::query("products.getBundle", AuthTier::Public, get_bundle),
        OperationDef::query("products.getCounters", AuthTier::Public, get_counters),
        OperationDef::mutation("products.trackView", AuthTier::Public, track_view),
    ]
}

// =============================================================================
// products.getById
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProductInput {
    pub product_id: ProductId,
}

impl ValidateInput for GetProductInput {}

/// Look up one product. An unknown id yields `null`, not an error - the
/// product screen handles the empty state itself.
#[instrument(skip(ctx), fields(product_id = %input.product_id))]
async fn get_by_id(ctx: OpContext, input: GetProductInput) -> Result<Option<Product>> {
    let rows = ctx
        .gateway
        .query_table(
            "products",
            TableQuery::new().eq("id", input.product_id).limit(1),
        )
        .await
        .map_err(|e| AppError::gateway("failed to load product", e))?;

    let mut products: Vec<Product> = decode_rows(rows, "products")?;
    Ok(products.pop())
}

// =============================================================================
// products.list
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListProductsInput {
    pub category: Option<ProductCategory>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ValidateInput for ListProductsInput {
    fn validate(&self) -> Result<()> {
        require_limit("limit", self.limit, MAX_PAGE_SIZE)
    }
}

#[instrument(skip(ctx))]
async fn list(ctx: OpContext, input: ListProductsInput) -> Result<Vec<Product>> {
    let mut query = TableQuery::new()
        .order("created_at.desc")
        .limit(input.limit.unwrap_or(DEFAULT_PAGE_SIZE))
        .offset(input.offset.unwrap_or(0));
    if let Some(category) = input.category {
        query = query.eq("category", category.as_str());
    }

    let rows = ctx
        .gateway
        .query_table("products", query)
        .await
        .map_err(|e| AppError::gateway("failed to load products", e))?;

    decode_rows(rows, "products")
}

// =============================================================================
// products.search
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProductsInput {
    pub query: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ValidateInput for SearchProductsInput {
    fn validate(&self) -> Result<()> {
        require_non_empty("query", &self.query)?;
        require_max_len("query", &self.query, MAX_QUERY_LEN)?;
        require_limit("limit", self.limit, MAX_SEARCH_RESULTS)
    }
}

#[instrument(skip(ctx), fields(query = %input.query))]
async fn search(ctx: OpContext, input: SearchProductsInput) -> Result<Vec<Product>> {
    let result = ctx
        .gateway
        .call_procedure(
            "search_products",
            json!({
                "query": input.query.trim(),
                "limit": input.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            }),
        )
        .await
        .map_err(|e| AppError::gateway("product search failed", e))?;

    decode_rows(result, "search_products")
}

// =============================================================================
// products.getBundle
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBundleInput {
    pub product_id: ProductId,
}

impl ValidateInput for GetBundleInput {}

/// A frequently-bought-together bundle with its discounted price.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSuggestion {
    pub products: Vec<Product>,
    /// Sum of constituent prices, minor units.
    pub total: i64,
    /// Total minus the bundle discount, minor units.
    pub bundle_price: i64,
    /// The discount amount, minor units.
    pub savings: i64,
}

#[instrument(skip(ctx), fields(product_id = %input.product_id))]
async fn get_bundle(ctx: OpContext, input: GetBundleInput) -> Result<BundleSuggestion> {
    let result = ctx
        .gateway
        .call_procedure(
            "get_frequently_bought_together",
            json!({ "product_id": input.product_id }),
        )
        .await
        .map_err(|e| AppError::gateway("failed to load bundle suggestion", e))?;

    let products: Vec<Product> = decode_rows(result, "get_frequently_bought_together")?;
    let (total, bundle_price, savings) =
        bundle_pricing(&products.iter().map(|p| p.price).collect::<Vec<_>>());

    Ok(BundleSuggestion {
        products,
        total,
        bundle_price,
        savings,
    })
}

/// Bundle price arithmetic: the discount is 10% of the combined price,
/// floored to an integer number of minor units.
fn bundle_pricing(prices: &[i64]) -> (i64, i64, i64) {
    let total: i64 = prices.iter().sum();
    let savings = total * BUNDLE_DISCOUNT_PERCENT / 100;
    (total, total - savings, savings)
}

// =============================================================================
// products.getCounters (soft read)
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCountersInput {
    pub product_id: ProductId,
}

impl ValidateInput for GetCountersInput {}

/// Live counters for the product screen. A failed or missing read degrades
/// to zero counters instead of breaking the screen.
#[instrument(skip(ctx), fields(product_id = %input.product_id))]
async fn get_counters(ctx: OpContext, input: GetCountersInput) -> Result<ProductCounters> {
    let rows = match ctx
        .gateway
        .query_table(
            "product_counters",
            TableQuery::new().eq("product_id", input.product_id).limit(1),
        )
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "Counters read failed; returning zero counters");
            return Ok(ProductCounters::default());
        }
    };

    let counters = match decode_rows::<ProductCounters>(rows, "product_counters") {
        Ok(mut rows) => rows.pop().unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Counters row unreadable; returning zero counters");
            ProductCounters::default()
        }
    };

    Ok(counters)
}

// =============================================================================
// products.trackView (soft write)
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackViewInput {
    pub product_id: ProductId,
}

impl ValidateInput for TrackViewInput {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackViewResult {
    pub recorded: bool,
}

/// Record a product view. A lost view is not worth an error screen, so the
/// write failure is logged and reported as `recorded: false`.
#[instrument(skip(ctx), fields(product_id = %input.product_id))]
async fn track_view(ctx: OpContext, input: TrackViewInput) -> Result<TrackViewResult> {
    let write = TableWrite::Insert(json!({ "product_id": input.product_id }));
    match ctx.gateway.write_table("product_views", write).await {
        Ok(_) => Ok(TrackViewResult { recorded: true }),
        Err(e) => {
            tracing::warn!(error = %e, "View tracking write failed");
            Ok(TrackViewResult { recorded: false })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_pricing_ten_percent() {
        // prices [100, 50, 30] -> total 180 -> discount 18 -> price 162
        let (total, bundle_price, savings) = bundle_pricing(&[100, 50, 30]);
        assert_eq!(total, 180);
        assert_eq!(bundle_price, 162);
        assert_eq!(savings, 18);
    }

    #[test]
    fn test_bundle_pricing_floors_discount() {
        // total 105 -> 10% is 10.5, floored to 10
        let (total, bundle_price, savings) = bundle_pricing(&[35, 70]);
        assert_eq!(total, 105);
        assert_eq!(savings, 10);
        assert_eq!(bundle_price, 95);
    }

    #[test]
    fn test_bundle_pricing_empty() {
        let (total, bundle_price, savings) = bundle_pricing(&[]);
        assert_eq!(total, 0);
        assert_eq!(bundle_price, 0);
        assert_eq!(savings, 0);
    }

    #[test]
    fn test_list_input_limit_bounds() {
        let input = ListProductsInput {
            limit: Some(0),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let input = ListProductsInput {
            limit: Some(101),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let input = ListProductsInput {
            limit: Some(100),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_search_input_rejects_empty_query() {
        let input = SearchProductsInput {
            query: "  ".to_string(),
            limit: None,
        };
        assert!(input.validate().is_err());

        let input = SearchProductsInput {
            query: "x".repeat(201),
            limit: None,
        };
        assert!(input.validate().is_err());
    }
}
