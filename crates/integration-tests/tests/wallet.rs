//! Wallet operations end to end against the scripted gateway.

use harvestly_integration_tests::{ctx, farmer, harness};
use serde_json::{Value, json};

fn wallet_row(display_id: &str, balance: i64) -> Value {
    json!({
        "id": "9e8d7c6b-5a49-4838-a7b6-c5d4e3f2a1b0",
        "user_id": "0a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d",
        "display_id": display_id,
        "balance": balance,
        "created_at": "2026-03-02T12:00:00Z"
    })
}

#[tokio::test]
async fn test_first_access_provisions_wallet() {
    let (registry, gateway) = harness();
    // No wallet row yet; the insert returns the created representation
    gateway.on_write("wallets", json!([wallet_row("482915730164", 0)]));

    let result = registry
        .dispatch("wallet.get", ctx(&gateway, Some(farmer())), Value::Null)
        .await
        .expect("first access provisions a wallet");

    // Exactly one read then one write, in that order
    assert_eq!(gateway.calls(), vec!["query:wallets", "write:wallets"]);
    assert_eq!(result["display_id"], "482915730164");
    assert_eq!(result["displayIdFormatted"], "482-915-730-164");
    assert_eq!(result["balance"], 0);
}

#[tokio::test]
async fn test_existing_wallet_is_returned_without_write() {
    let (registry, gateway) = harness();
    gateway.on_query("wallets", json!([wallet_row("123456789012", 2750)]));

    let result = registry
        .dispatch("wallet.get", ctx(&gateway, Some(farmer())), Value::Null)
        .await
        .expect("existing wallet loads");

    assert_eq!(gateway.calls(), vec!["query:wallets"]);
    assert_eq!(result["balance"], 2750);
    assert_eq!(result["displayIdFormatted"], "123-456-789-012");
}

#[tokio::test]
async fn test_top_up_returns_updated_wallet() {
    let (registry, gateway) = harness();
    gateway.on_procedure("wallet_top_up", wallet_row("123456789012", 3250));

    let result = registry
        .dispatch(
            "wallet.topUp",
            ctx(&gateway, Some(farmer())),
            json!({ "amount": 500 }),
        )
        .await
        .expect("top-up succeeds");

    assert_eq!(gateway.calls(), vec!["procedure:wallet_top_up"]);
    assert_eq!(result["balance"], 3250);
}

#[tokio::test]
async fn test_transfer_rejects_malformed_recipient_before_any_call() {
    let (registry, gateway) = harness();

    let err = registry
        .dispatch(
            "wallet.transfer",
            ctx(&gateway, Some(farmer())),
            json!({ "recipientDisplayId": "123-456-789-012", "amount": 500 }),
        )
        .await
        .expect_err("dashed form is not a valid recipient id");

    assert_eq!(err.code(), "BAD_REQUEST");
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_transactions_default_to_empty_page() {
    let (registry, gateway) = harness();

    let result = registry
        .dispatch(
            "wallet.getTransactions",
            ctx(&gateway, Some(farmer())),
            Value::Null,
        )
        .await
        .expect("empty ledger is fine");

    assert_eq!(result, json!([]));
    assert_eq!(gateway.calls(), vec!["query:wallet_transactions"]);
}
