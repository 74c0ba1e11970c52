//! Product operations end to end against the scripted gateway.

use harvestly_integration_tests::{ctx, harness};
use serde_json::{Value, json};

fn product_row(name: &str, price: i64) -> Value {
    json!({
        "id": "7b0a3f9e-0c1d-4e2f-8a3b-4c5d6e7f8a9b",
        "farm_id": "1b2c3d4e-5f60-4172-8394-a5b6c7d8e9f0",
        "name": name,
        "category": "produce",
        "price": price,
        "unit": "kg",
        "created_at": "2026-03-02T12:00:00Z"
    })
}

#[tokio::test]
async fn test_get_by_id_returns_row() {
    let (registry, gateway) = harness();
    gateway.on_query("products", json!([product_row("Heirloom Tomatoes", 450)]));

    let result = registry
        .dispatch(
            "products.getById",
            ctx(&gateway, None),
            json!({ "productId": "7b0a3f9e-0c1d-4e2f-8a3b-4c5d6e7f8a9b" }),
        )
        .await
        .expect("product loads");

    assert_eq!(result["name"], "Heirloom Tomatoes");
    // Absent from the row, defaulted on the way through
    assert_eq!(result["in_stock"], true);
}

#[tokio::test]
async fn test_get_by_id_unknown_product_is_null() {
    let (registry, gateway) = harness();
    // Unscripted queries return an empty row set

    let result = registry
        .dispatch(
            "products.getById",
            ctx(&gateway, None),
            json!({ "productId": "7b0a3f9e-0c1d-4e2f-8a3b-4c5d6e7f8a9b" }),
        )
        .await
        .expect("missing product is not an error");

    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn test_bundle_applies_ten_percent_discount() {
    let (registry, gateway) = harness();
    gateway.on_procedure(
        "get_frequently_bought_together",
        json!([
            product_row("Tomatoes", 100),
            product_row("Basil", 50),
            product_row("Mozzarella", 30),
        ]),
    );

    let result = registry
        .dispatch(
            "products.getBundle",
            ctx(&gateway, None),
            json!({ "productId": "7b0a3f9e-0c1d-4e2f-8a3b-4c5d6e7f8a9b" }),
        )
        .await
        .expect("bundle loads");

    assert_eq!(result["total"], 180);
    assert_eq!(result["savings"], 18);
    assert_eq!(result["bundlePrice"], 162);
    assert_eq!(result["products"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_search_passes_through_procedure_rows() {
    let (registry, gateway) = harness();
    gateway.on_procedure("search_products", json!([product_row("Basil", 50)]));

    let result = registry
        .dispatch(
            "products.search",
            ctx(&gateway, None),
            json!({ "query": "basil" }),
        )
        .await
        .expect("search succeeds");

    assert_eq!(gateway.calls(), vec!["procedure:search_products"]);
    assert_eq!(result[0]["name"], "Basil");
}

#[tokio::test]
async fn test_track_view_reports_recorded() {
    let (registry, gateway) = harness();

    let result = registry
        .dispatch(
            "products.trackView",
            ctx(&gateway, None),
            json!({ "productId": "7b0a3f9e-0c1d-4e2f-8a3b-4c5d6e7f8a9b" }),
        )
        .await
        .expect("view records");

    assert_eq!(result, json!({ "recorded": true }));
    assert_eq!(gateway.calls(), vec!["write:product_views"]);
}
