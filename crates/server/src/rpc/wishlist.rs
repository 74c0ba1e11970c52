//! Wishlist operations.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use harvestly_core::{ProductId, WishlistItem};

use crate::error::{AppError, Result};
use crate::gateway::{TableQuery, TableWrite};

use super::{Ack, AuthTier, OpContext, OperationDef, ValidateInput, decode_rows};

pub(super) fn operations() -> Vec<OperationDef> {
    vec![
        OperationDef::query("wishlist.list", AuthTier::Protected, list),
        OperationDef::mutation("wishlist.add", AuthTier::Protected, add),
        OperationDef::mutation("wishlist.remove", AuthTier::Protected, remove),
    ]
}

// =============================================================================
// wishlist.list
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListWishlistInput {}

impl ValidateInput for ListWishlistInput {}

#[instrument(skip(ctx, _input))]
async fn list(ctx: OpContext, _input: ListWishlistInput) -> Result<Vec<WishlistItem>> {
    let user_id = ctx.user_id()?;

    let rows = ctx
        .gateway
        .query_table(
            "wishlist_items",
            TableQuery::new()
                .eq("user_id", user_id)
                .order("added_at.desc"),
        )
        .await
        .map_err(|e| AppError::gateway("failed to load wishlist", e))?;

    decode_rows(rows, "wishlist_items")
}

// =============================================================================
// wishlist.add
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistInput {
    pub product_id: ProductId,
}

impl ValidateInput for AddWishlistInput {}

/// Add a product to the wishlist. Upserting on the (user, product) pair
/// makes repeated adds a no-op rather than an error.
#[instrument(skip(ctx), fields(product_id = %input.product_id))]
async fn add(ctx: OpContext, input: AddWishlistInput) -> Result<Ack> {
    let user_id = ctx.user_id()?;

    ctx.gateway
        .write_table(
            "wishlist_items",
            TableWrite::Upsert {
                payload: json!({ "user_id": user_id, "product_id": input.product_id }),
                on_conflict: "user_id,product_id".to_string(),
            },
        )
        .await
        .map_err(|e| AppError::gateway("failed to add to wishlist", e))?;

    Ok(Ack::OK)
}

// =============================================================================
// wishlist.remove
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveWishlistInput {
    pub product_id: ProductId,
}

impl ValidateInput for RemoveWishlistInput {}

#[instrument(skip(ctx), fields(product_id = %input.product_id))]
async fn remove(ctx: OpContext, input: RemoveWishlistInput) -> Result<Ack> {
    let user_id = ctx.user_id()?;

    ctx.gateway
        .write_table(
            "wishlist_items",
            TableWrite::Delete {
                filters: vec![
                    ("user_id".to_string(), format!("eq.{user_id}")),
                    ("product_id".to_string(), format!("eq.{}", input.product_id)),
                ],
            },
        )
        .await
        .map_err(|e| AppError::gateway("failed to remove from wishlist", e))?;

    Ok(Ack::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_input_requires_uuid_product_id() {
        let ok: std::result::Result<AddWishlistInput, _> = serde_json::from_value(
            serde_json::json!({"productId": "7b0a3f9e-0c1d-4e2f-8a3b-4c5d6e7f8a9b"}),
        );
        assert!(ok.is_ok());

        let bad: std::result::Result<AddWishlistInput, _> =
            serde_json::from_value(serde_json::json!({"productId": "not-a-uuid"}));
        assert!(bad.is_err());
    }
}
