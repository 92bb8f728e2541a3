//! Quote client tests against a local stand-in for the daily time-series API.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use portfolio_tracker::error::PortfolioError;
use portfolio_tracker::quote::{AlphaVantageClient, QuoteSource};
use rust_decimal_macros::dec;
use std::collections::HashMap;

async fn query(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<serde_json::Value>) {
    assert_eq!(params.get("function").map(String::as_str), Some("TIME_SERIES_DAILY"));
    assert_eq!(params.get("apikey").map(String::as_str), Some("test-key"));

    match params.get("symbol").map(String::as_str) {
        Some("AAPL") => (
            StatusCode::OK,
            Json(serde_json::json!({
                "Meta Data": { "2. Symbol": "AAPL" },
                "Time Series (Daily)": {
                    "2022-01-12": { "1. open": "176.12", "4. close": "175.53" },
                    "2022-01-11": { "1. open": "172.32", "4. close": "n/a" },
                    "2022-01-10": { "1. open": "169.08", "4. close": "172.19" }
                }
            })),
        ),
        Some("LIMIT") => (
            StatusCode::OK,
            Json(serde_json::json!({ "Note": "API call frequency exceeded" })),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "Error Message": "boom" })),
        ),
    }
}

async fn spawn_quote_api() -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/query", get(query));
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/", addr), handle)
}

#[tokio::test]
async fn returns_close_for_requested_day() {
    let (base_url, _handle) = spawn_quote_api().await;
    let client = AlphaVantageClient::new(base_url, "test-key");

    let price = client.get_price_on_date("AAPL", "2022-01-12").await.unwrap();
    assert_eq!(price, dec!(175.53));
    let price = client.get_price_on_date("AAPL", "2022-01-10").await.unwrap();
    assert_eq!(price, dec!(172.19));
}

#[tokio::test]
async fn missing_or_malformed_day_is_upstream_error() {
    let (base_url, _handle) = spawn_quote_api().await;
    let client = AlphaVantageClient::new(base_url, "test-key");

    for date in ["2022-01-11", "2022-01-09"] {
        let err = client.get_price_on_date("AAPL", date).await.unwrap_err();
        assert!(matches!(err, PortfolioError::UpstreamQuoteError(_)), "{date}: {err}");
    }
}

#[tokio::test]
async fn error_payloads_and_statuses_are_upstream_errors() {
    let (base_url, _handle) = spawn_quote_api().await;
    let client = AlphaVantageClient::new(base_url, "test-key");

    let err = client.get_price_on_date("LIMIT", "2022-01-12").await.unwrap_err();
    assert_eq!(err.kind(), "upstream_quote_error");

    let err = client.get_price_on_date("FAIL", "2022-01-12").await.unwrap_err();
    assert_eq!(err.kind(), "upstream_quote_error");
}

#[tokio::test]
async fn bad_dates_are_rejected_before_any_request() {
    // Nothing listens here; reaching the network would be an upstream error.
    let client = AlphaVantageClient::new("http://127.0.0.1:1", "test-key");
    let tomorrow = (chrono::Utc::now().date_naive() + chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    for date in ["2022-01-8", "2022-13-12", "2022-11-52", tomorrow.as_str()] {
        let err = client.get_price_on_date("AAPL", date).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_input", "{date}");
    }
}
