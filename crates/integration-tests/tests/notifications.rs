//! Notification operations end to end against the scripted gateway.

use harvestly_integration_tests::{ctx, farmer, harness};
use serde_json::{Value, json};

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let (registry, gateway) = harness();
    let user = farmer();
    let input = json!({ "notificationId": "3c4d5e6f-7a8b-4c9d-8e0f-1a2b3c4d5e6f" });

    // Marking the same notification twice acknowledges both times; the
    // second update matches an already-read row and is still a success
    for _ in 0..2 {
        let result = registry
            .dispatch(
                "notifications.markRead",
                ctx(&gateway, Some(user.clone())),
                input.clone(),
            )
            .await
            .expect("mark-read succeeds");
        assert_eq!(result, json!({ "success": true }));
    }

    assert_eq!(
        gateway.calls(),
        vec!["write:notifications", "write:notifications"]
    );
}

#[tokio::test]
async fn test_mark_all_read_acknowledges() {
    let (registry, gateway) = harness();

    let result = registry
        .dispatch(
            "notifications.markAllRead",
            ctx(&gateway, Some(farmer())),
            Value::Null,
        )
        .await
        .expect("mark-all-read succeeds");

    assert_eq!(result, json!({ "success": true }));
}

#[tokio::test]
async fn test_list_returns_gateway_rows() {
    let (registry, gateway) = harness();
    gateway.on_query(
        "notifications",
        json!([{
            "id": "3c4d5e6f-7a8b-4c9d-8e0f-1a2b3c4d5e6f",
            "kind": "order",
            "title": "Your order shipped",
            "created_at": "2026-03-02T12:00:00Z"
        }]),
    );

    let result = registry
        .dispatch(
            "notifications.list",
            ctx(&gateway, Some(farmer())),
            Value::Null,
        )
        .await
        .expect("list succeeds");

    assert_eq!(result[0]["title"], "Your order shipped");
    // `read` missing at the gateway defaults to false
    assert_eq!(result[0]["read"], false);
}

#[tokio::test]
async fn test_register_device_rejects_empty_token_before_any_call() {
    let (registry, gateway) = harness();

    let err = registry
        .dispatch(
            "notifications.registerDevice",
            ctx(&gateway, Some(farmer())),
            json!({ "token": "", "platform": "ios" }),
        )
        .await
        .expect_err("empty token is invalid");

    assert_eq!(err.code(), "BAD_REQUEST");
    assert_eq!(gateway.call_count(), 0);
}
