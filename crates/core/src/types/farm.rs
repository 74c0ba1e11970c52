//! Farm records and farm analytics shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::FarmId;

/// A farm (seller) on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    pub id: FarmId,
    pub name: String,
    pub region: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Average review rating, absent until the first review lands.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Reporting period for farm analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsPeriod {
    Day,
    Week,
    Month,
}

/// Aggregated farm analytics computed by the `get_farm_analytics` gateway
/// procedure. All fields default to zero; a degraded read returns the same
/// shape as a farm with no traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmAnalytics {
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub orders: i64,
    /// Gross revenue in minor currency units.
    #[serde(default)]
    pub revenue: i64,
}
