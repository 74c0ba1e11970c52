//! Wishlist records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A single wishlist entry for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}
