//! Wallet and wallet-transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{TransactionId, UserId, WalletId};

/// A user's wallet as stored at the gateway.
///
/// `display_id` is the human-facing 12-digit identifier (see
/// [`crate::types::display_id`]); balances are tracked in minor currency
/// units and only ever mutated by gateway procedures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub user_id: UserId,
    pub display_id: String,
    pub balance: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Direction/kind of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    TopUp,
    Payment,
    TransferIn,
    TransferOut,
    Refund,
}

/// A single ledger entry for a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: TransactionId,
    pub wallet_id: WalletId,
    pub kind: TransactionKind,
    /// Amount in minor currency units; always positive, direction is in `kind`.
    pub amount: i64,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
