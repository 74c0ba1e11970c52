//! Product records as returned by the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{FarmId, ProductId};

/// A product listed on the marketplace.
///
/// Mirrors the `products` table at the gateway; this codebase never writes
/// product rows, it only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub farm_id: FarmId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: ProductCategory,
    /// Price in minor currency units (e.g., cents).
    pub price: i64,
    /// Sales unit shown next to the price (e.g., "kg", "bunch", "dozen").
    pub unit: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

const fn default_in_stock() -> bool {
    true
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Produce,
    Dairy,
    Meat,
    Bakery,
    Pantry,
    Flowers,
    Other,
}

impl ProductCategory {
    /// The wire form used in gateway table filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Produce => "produce",
            Self::Dairy => "dairy",
            Self::Meat => "meat",
            Self::Bakery => "bakery",
            Self::Pantry => "pantry",
            Self::Flowers => "flowers",
            Self::Other => "other",
        }
    }
}

/// Soft per-product counters shown on the product screen.
///
/// Every field is optional at the gateway; missing values default to zero so
/// a degraded read is shape-identical to a genuinely empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCounters {
    #[serde(default)]
    pub views_today: i64,
    #[serde(default)]
    pub orders_today: i64,
    #[serde(default)]
    pub in_carts: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_gateway_row() {
        let row = serde_json::json!({
            "id": "7b0a3f9e-0c1d-4e2f-8a3b-4c5d6e7f8a9b",
            "farm_id": "1b2c3d4e-5f60-4172-8394-a5b6c7d8e9f0",
            "name": "Heirloom Tomatoes",
            "category": "produce",
            "price": 450,
            "unit": "kg",
            "created_at": "2026-08-01T09:30:00Z"
        });

        let product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.name, "Heirloom Tomatoes");
        assert_eq!(product.category, ProductCategory::Produce);
        assert_eq!(product.price, 450);
        // Optional fields fall back to their defaults
        assert!(product.description.is_none());
        assert!(product.in_stock);
    }

    #[test]
    fn test_counters_default_to_zero() {
        let counters: ProductCounters = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(counters, ProductCounters::default());
        assert_eq!(counters.views_today, 0);
    }

    #[test]
    fn test_counters_partial_row() {
        let counters: ProductCounters =
            serde_json::from_value(serde_json::json!({"views_today": 7})).unwrap();
        assert_eq!(counters.views_today, 7);
        assert_eq!(counters.orders_today, 0);
        assert_eq!(counters.in_carts, 0);
    }

    #[test]
    fn test_category_rejects_unknown_value() {
        let result: Result<ProductCategory, _> =
            serde_json::from_value(serde_json::json!("gadgets"));
        assert!(result.is_err());
    }
}
