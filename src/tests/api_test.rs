//! Unit tests for the API types and the wire-format adapter

use serde_json::json;

use crate::api::{ApiError, HealthStatus, Holding, NewHoldingRequest, NewsItem, RawHolding};

fn holding(shares: f64, avg_price: f64, current_price: f64) -> Holding {
    Holding {
        id: "1".to_string(),
        symbol: "AAPL".to_string(),
        name: "Apple Inc.".to_string(),
        shares,
        avg_price,
        current_price,
    }
}

// ============================================================================
// ADAPTER TESTS
// ============================================================================

#[test]
fn test_normalize_camel_case_payload() {
    let raw: RawHolding = serde_json::from_value(json!({
        "id": "7",
        "symbol": "MSFT",
        "name": "Microsoft Corp.",
        "shares": 40.0,
        "avgPrice": 300.0,
        "currentPrice": 320.0
    }))
    .unwrap();
    let h = raw.into_holding().unwrap();
    assert_eq!(h.symbol, "MSFT");
    assert_eq!(h.avg_price, 300.0);
    assert_eq!(h.current_price, 320.0);
}

#[test]
fn test_normalize_snake_case_payload() {
    let raw: RawHolding = serde_json::from_value(json!({
        "id": "7",
        "symbol": "MSFT",
        "shares": 40.0,
        "avg_price": 300.0,
        "current_price": 320.0
    }))
    .unwrap();
    let h = raw.into_holding().unwrap();
    assert_eq!(h.avg_price, 300.0);
    assert_eq!(h.current_price, 320.0);
}

#[test]
fn test_normalize_nested_price_data_wins() {
    let raw: RawHolding = serde_json::from_value(json!({
        "id": "7",
        "symbol": "MSFT",
        "shares": 40.0,
        "avgPrice": 300.0,
        "currentPrice": 310.0,
        "priceData": { "last": 320.0 }
    }))
    .unwrap();
    let h = raw.into_holding().unwrap();
    assert_eq!(h.current_price, 320.0);
}

#[test]
fn test_normalize_missing_price_is_payload_error() {
    let raw: RawHolding = serde_json::from_value(json!({
        "id": "7",
        "symbol": "MSFT",
        "shares": 40.0,
        "avgPrice": 300.0
    }))
    .unwrap();
    let err = raw.into_holding().unwrap_err();
    assert!(matches!(err, ApiError::Payload(_)));
}

#[test]
fn test_normalize_name_falls_back_to_symbol() {
    let raw: RawHolding = serde_json::from_value(json!({
        "id": "7",
        "symbol": "MSFT",
        "shares": 40.0,
        "avgPrice": 300.0,
        "currentPrice": 320.0
    }))
    .unwrap();
    assert_eq!(raw.into_holding().unwrap().name, "MSFT");
}

#[test]
fn test_normalize_array_payload() {
    let raw: Vec<RawHolding> = serde_json::from_value(json!([
        { "id": "1", "symbol": "AAPL", "shares": 50.0, "avg_price": 150.0, "current_price": 175.0 },
        { "id": "2", "symbol": "NVDA", "shares": 35.0, "avgPrice": 450.0, "priceData": { "last": 520.0 } }
    ]))
    .unwrap();
    let holdings: Result<Vec<Holding>, ApiError> =
        raw.into_iter().map(RawHolding::into_holding).collect();
    let holdings = holdings.unwrap();
    assert_eq!(holdings.len(), 2);
    assert_eq!(holdings[1].current_price, 520.0);
}

// ============================================================================
// DERIVED HOLDING MATH
// ============================================================================

#[test]
fn test_holding_derived_values() {
    let h = holding(50.0, 150.0, 175.0);
    assert_eq!(h.market_value(), 8750.0);
    assert_eq!(h.cost_basis(), 7500.0);
    assert_eq!(h.change(), 1250.0);
    assert!((h.change_percent() - 16.6666).abs() < 0.01);
}

#[test]
fn test_holding_negative_change() {
    let h = holding(25.0, 700.0, 680.0);
    assert_eq!(h.change(), -500.0);
    assert!(h.change_percent() < 0.0);
}

#[test]
fn test_holding_zero_cost_basis_percent_is_zero() {
    let h = holding(10.0, 0.0, 5.0);
    assert_eq!(h.change_percent(), 0.0);
    assert!(!h.change_percent().is_nan());
}

// ============================================================================
// REQUEST / RESPONSE TYPES
// ============================================================================

#[test]
fn test_new_holding_request_body() {
    let body = serde_json::to_value(NewHoldingRequest {
        symbol: "AAPL".to_string(),
        shares: 50.0,
        avg_price: 150.0,
        name: None,
    })
    .unwrap();
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["avg_price"], 150.0);
    assert!(body.get("name").is_none());
}

#[test]
fn test_new_holding_request_carries_selected_name() {
    let body = serde_json::to_value(NewHoldingRequest {
        symbol: "AAPL".to_string(),
        shares: 50.0,
        avg_price: 150.0,
        name: Some("Apple Inc.".to_string()),
    })
    .unwrap();
    assert_eq!(body["name"], "Apple Inc.");
}

#[test]
fn test_news_item_published_date_field() {
    let item: NewsItem = serde_json::from_value(json!({
        "id": "n1",
        "title": "Markets rally",
        "source": "Newswire",
        "publishedDate": "2024-05-01T12:30:00Z",
        "url": "https://news.example.com/n1"
    }))
    .unwrap();
    assert_eq!(item.source, "Newswire");
    assert_eq!(item.published.to_rfc3339(), "2024-05-01T12:30:00+00:00");
}

#[test]
fn test_news_item_snake_case_alias() {
    let item: NewsItem = serde_json::from_value(json!({
        "id": "n1",
        "title": "Markets rally",
        "source": "Newswire",
        "published_at": "2024-05-01T12:30:00Z",
        "url": "https://news.example.com/n1"
    }))
    .unwrap();
    assert_eq!(item.title, "Markets rally");
}

#[test]
fn test_health_status_defaults() {
    let status: HealthStatus = serde_json::from_value(json!({})).unwrap();
    assert!(status.core);
    assert_eq!(status.status, "ok");

    let status: HealthStatus = serde_json::from_value(json!({
        "core": false,
        "status": "degraded"
    }))
    .unwrap();
    assert!(!status.core);
    assert_eq!(status.status, "degraded");
}

// ============================================================================
// ERROR DISPLAY
// ============================================================================

#[test]
fn test_api_error_display() {
    assert_eq!(
        ApiError::Network("connection refused".to_string()).to_string(),
        "network error: connection refused"
    );
    assert_eq!(
        ApiError::Http {
            status: 422,
            message: "invalid symbol".to_string()
        }
        .to_string(),
        "HTTP 422: invalid symbol"
    );
    assert_eq!(
        ApiError::Payload("expected array".to_string()).to_string(),
        "unexpected response: expected array"
    );
}
