//! Wallet operations.
//!
//! All wallet operations are protected. Balance arithmetic lives entirely
//! in gateway procedures; this layer only reads wallet rows, provisions a
//! wallet with a fresh display id on first access, and forwards top-up and
//! transfer requests.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use harvestly_core::{Wallet, WalletTransaction, display_id};

use crate::error::{AppError, Result};
use crate::gateway::{TableQuery, TableWrite};

use super::validate::{require_limit, require_max_len, require_range};
use super::{AuthTier, OpContext, OperationDef, ValidateInput, decode_rows, decode_value};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const MAX_NOTE_LEN: usize = 200;

/// Top-up and transfer bounds, in minor currency units.
const MIN_AMOUNT: i64 = 1;
const MAX_AMOUNT: i64 = 1_000_000;

pub(super) fn operations() -> Vec<OperationDef> {
    vec![
        OperationDef::query("wallet.get", AuthTier::Protected, get),
        OperationDef::query(
            "wallet.getTransactions",
            AuthTier::Protected,
            get_transactions,
        ),
        OperationDef::mutation("wallet.topUp", AuthTier::Protected, top_up),
        OperationDef::mutation("wallet.transfer", AuthTier::Protected, transfer),
    ]
}

// =============================================================================
// wallet.get
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct GetWalletInput {}

impl ValidateInput for GetWalletInput {}

/// A wallet with its display id pre-formatted for the wallet screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletView {
    #[serde(flatten)]
    pub wallet: Wallet,
    pub display_id_formatted: String,
}

/// Fetch the caller's wallet, provisioning one on first access.
///
/// Provisioning generates a display id locally with no collision check; the
/// gateway's unique constraint on `display_id` is the arbiter, and a clash
/// surfaces as a (rare) provisioning failure the client retries.
#[instrument(skip(ctx, _input))]
async fn get(ctx: OpContext, _input: GetWalletInput) -> Result<WalletView> {
    let user_id = ctx.user_id()?;

    let rows = ctx
        .gateway
        .query_table(
            "wallets",
            TableQuery::new().eq("user_id", user_id).limit(1),
        )
        .await
        .map_err(|e| AppError::gateway("failed to load wallet", e))?;

    let mut wallets: Vec<Wallet> = decode_rows(rows, "wallets")?;
    if let Some(wallet) = wallets.pop() {
        return Ok(wallet_view(wallet));
    }

    // First access: provision a wallet with a fresh display id
    let new_display_id = display_id::generate();
    tracing::info!(%user_id, "Provisioning wallet on first access");

    let created = ctx
        .gateway
        .write_table(
            "wallets",
            TableWrite::Insert(json!({
                "user_id": user_id,
                "display_id": new_display_id,
                "balance": 0,
            })),
        )
        .await
        .map_err(|e| AppError::gateway("failed to create wallet", e))?;

    let mut created: Vec<Wallet> = decode_rows(created, "wallets")?;
    let wallet = created
        .pop()
        .ok_or_else(|| AppError::NotFound("wallet was not created".to_string()))?;

    Ok(wallet_view(wallet))
}

fn wallet_view(wallet: Wallet) -> WalletView {
    let display_id_formatted = display_id::format(&wallet.display_id);
    WalletView {
        wallet,
        display_id_formatted,
    }
}

// =============================================================================
// wallet.getTransactions
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetTransactionsInput {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ValidateInput for GetTransactionsInput {
    fn validate(&self) -> Result<()> {
        require_limit("limit", self.limit, MAX_PAGE_SIZE)
    }
}

#[instrument(skip(ctx))]
async fn get_transactions(
    ctx: OpContext,
    input: GetTransactionsInput,
) -> Result<Vec<WalletTransaction>> {
    let user_id = ctx.user_id()?;

    let rows = ctx
        .gateway
        .query_table(
            "wallet_transactions",
            TableQuery::new()
                .eq("user_id", user_id)
                .order("created_at.desc")
                .limit(input.limit.unwrap_or(DEFAULT_PAGE_SIZE))
                .offset(input.offset.unwrap_or(0)),
        )
        .await
        .map_err(|e| AppError::gateway("failed to load transactions", e))?;

    decode_rows(rows, "wallet_transactions")
}

// =============================================================================
// wallet.topUp
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpInput {
    /// Amount in minor currency units.
    pub amount: i64,
}

impl ValidateInput for TopUpInput {
    fn validate(&self) -> Result<()> {
        require_range("amount", self.amount, MIN_AMOUNT, MAX_AMOUNT)
    }
}

/// Forward a top-up to the `wallet_top_up` procedure, which owns the
/// balance arithmetic and the ledger entry. Returns the updated wallet.
#[instrument(skip(ctx), fields(amount = input.amount))]
async fn top_up(ctx: OpContext, input: TopUpInput) -> Result<Wallet> {
    let user_id = ctx.user_id()?;

    let result = ctx
        .gateway
        .call_procedure(
            "wallet_top_up",
            json!({ "user_id": user_id, "amount": input.amount }),
        )
        .await
        .map_err(|e| AppError::gateway("top-up failed", e))?;

    decode_value(result, "wallet_top_up")
}

// =============================================================================
// wallet.transfer
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInput {
    /// The recipient wallet's 12-digit display id.
    pub recipient_display_id: String,
    /// Amount in minor currency units.
    pub amount: i64,
    #[serde(default)]
    pub note: Option<String>,
}

impl ValidateInput for TransferInput {
    fn validate(&self) -> Result<()> {
        if !display_id::is_valid(&self.recipient_display_id) {
            return Err(AppError::Validation(
                "recipientDisplayId must be a 12-digit wallet id".to_string(),
            ));
        }
        require_range("amount", self.amount, MIN_AMOUNT, MAX_AMOUNT)?;
        if let Some(note) = &self.note {
            require_max_len("note", note, MAX_NOTE_LEN)?;
        }
        Ok(())
    }
}

/// Forward a transfer to the `wallet_transfer` procedure. Recipient
/// resolution, balance checks, and both ledger entries happen server-side
/// at the gateway; an unknown recipient or insufficient balance comes back
/// as a gateway error. Returns the sender's updated wallet.
#[instrument(skip(ctx, input), fields(amount = input.amount))]
async fn transfer(ctx: OpContext, input: TransferInput) -> Result<Wallet> {
    let user_id = ctx.user_id()?;

    let result = ctx
        .gateway
        .call_procedure(
            "wallet_transfer",
            json!({
                "user_id": user_id,
                "recipient_display_id": input.recipient_display_id,
                "amount": input.amount,
                "note": input.note,
            }),
        )
        .await
        .map_err(|e| AppError::gateway("transfer failed", e))?;

    decode_value(result, "wallet_transfer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_up_amount_bounds() {
        assert!(TopUpInput { amount: 0 }.validate().is_err());
        assert!(TopUpInput { amount: -100 }.validate().is_err());
        assert!(TopUpInput { amount: 1 }.validate().is_ok());
        assert!(TopUpInput { amount: 1_000_000 }.validate().is_ok());
        assert!(TopUpInput { amount: 1_000_001 }.validate().is_err());
    }

    #[test]
    fn test_transfer_requires_valid_display_id() {
        let input = TransferInput {
            recipient_display_id: "123456789012".to_string(),
            amount: 500,
            note: None,
        };
        assert!(input.validate().is_ok());

        let input = TransferInput {
            recipient_display_id: "123-456-789-012".to_string(),
            amount: 500,
            note: None,
        };
        assert!(input.validate().is_err());

        let input = TransferInput {
            recipient_display_id: "12345".to_string(),
            amount: 500,
            note: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_transfer_note_length() {
        let input = TransferInput {
            recipient_display_id: "123456789012".to_string(),
            amount: 500,
            note: Some("x".repeat(201)),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_wallet_view_formats_display_id() {
        let wallet: Wallet = serde_json::from_value(serde_json::json!({
            "id": "9e8d7c6b-5a49-4838-a7b6-c5d4e3f2a1b0",
            "user_id": "0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d",
            "display_id": "482915730164",
            "balance": 0,
            "created_at": "2026-03-02T12:00:00Z"
        }))
        .expect("valid wallet row");

        let view = wallet_view(wallet);
        assert_eq!(view.display_id_formatted, "482-915-730-164");
    }
}
