//! Notification records and push-device shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::NotificationId;

/// An in-app notification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification category, used for filtering and icons client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Order,
    Promotion,
    Wallet,
    System,
}

/// Unread-notification count, a soft read that defaults to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    #[serde(default)]
    pub count: i64,
}

/// Mobile platform for a registered push-notification device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevicePlatform {
    Ios,
    Android,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_read_defaults_false() {
        let row = serde_json::json!({
            "id": "5f6e7d8c-9b0a-4112-8334-455667788990",
            "kind": "order",
            "title": "Your order shipped",
            "created_at": "2026-08-20T08:00:00Z"
        });

        let notification: Notification = serde_json::from_value(row).unwrap();
        assert!(!notification.read);
        assert_eq!(notification.kind, NotificationKind::Order);
    }

    #[test]
    fn test_unread_count_defaults_to_zero() {
        let count: UnreadCount = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(count.count, 0);
    }

    #[test]
    fn test_device_platform_rejects_unknown() {
        let bad: Result<DevicePlatform, _> = serde_json::from_value(serde_json::json!("windows"));
        assert!(bad.is_err());
    }
}
