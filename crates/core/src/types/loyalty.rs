//! Loyalty program shapes: points, badges, and challenges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ChallengeId;

/// A user's loyalty standing as computed by the `get_loyalty_status` gateway
/// procedure.
///
/// Defaults to an empty standing (zero points, no badges, no challenges) so
/// that a user without a loyalty record - or a degraded read - produces the
/// same shape as a genuinely fresh account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyStatus {
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub challenges: Vec<ChallengeProgress>,
}

/// A badge earned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub earned_at: DateTime<Utc>,
}

/// A marketplace-wide challenge users can opt into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub goal: i64,
    pub reward_points: i64,
    #[serde(default)]
    pub active: bool,
}

/// A user's progress against one challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub challenge_id: ChallengeId,
    pub progress: i64,
    pub goal: i64,
    #[serde(default)]
    pub completed: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_loyalty_status_default_is_empty() {
        let status = LoyaltyStatus::default();
        assert_eq!(status.points, 0);
        assert!(status.badges.is_empty());
        assert!(status.challenges.is_empty());
    }

    #[test]
    fn test_loyalty_status_from_empty_record() {
        // A user with no loyalty record deserializes to the same shape as
        // LoyaltyStatus::default()
        let status: LoyaltyStatus = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(status, LoyaltyStatus::default());
    }

    #[test]
    fn test_loyalty_status_full_record() {
        let status: LoyaltyStatus = serde_json::from_value(serde_json::json!({
            "points": 320,
            "badges": [
                {"id": "first_order", "name": "First Order", "earned_at": "2026-02-01T00:00:00Z"}
            ],
            "challenges": [
                {"challenge_id": "3c4d5e6f-7a8b-4c9d-8e0f-1a2b3c4d5e6f", "progress": 2, "goal": 5}
            ]
        }))
        .unwrap();

        assert_eq!(status.points, 320);
        assert_eq!(status.badges.len(), 1);
        assert_eq!(status.challenges.len(), 1);
        assert!(!status.challenges.first().unwrap().completed);
    }
}
