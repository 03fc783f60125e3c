//! Exercises the Polygon client against a local fake upstream

use std::time::Duration;

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shared::{IngestError, MarketDataSource, PolygonApiClient};

const API_KEY: &str = "test-api-key";

async fn aggregates(
    Path((ticker, multiplier, timespan, from, to)): Path<(String, String, String, String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", API_KEY))
        .unwrap_or(false);

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "ERROR", "error": "Unknown API Key"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "ticker": ticker,
            "status": "OK",
            "echo": {"multiplier": multiplier, "timespan": timespan, "from": from, "to": to},
            "results": [{"o": 1.0, "c": 2.0, "h": 3.0, "l": 0.5, "v": 10, "vw": 1.5, "t": 1609736400000i64}]
        })),
    )
}

/// Starts the fake upstream on an ephemeral port and returns its base URL.
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route(
            "/v2/aggs/ticker/:ticker/range/:multiplier/:timespan/:from/:to",
            get(aggregates),
        )
        .route("/broken/v2/aggs/ticker/:ticker/range/:multiplier/:timespan/:from/:to", get(|| async { "not json" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: String, api_key: &str) -> PolygonApiClient {
    PolygonApiClient::new(
        base_url,
        api_key.to_string(),
        5,
        "minute".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetch_bars_builds_url_and_sends_bearer_token() {
    let base_url = spawn_upstream().await;

    let body = client(base_url, API_KEY)
        .fetch_bars("AAPL", "2021-01-01", "2021-01-02")
        .await
        .unwrap();

    assert_eq!(body["ticker"], "AAPL");
    assert_eq!(
        body["echo"],
        json!({"multiplier": "5", "timespan": "minute", "from": "2021-01-01", "to": "2021-01-02"})
    );
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_fetch_bars_surfaces_upstream_status() {
    let base_url = spawn_upstream().await;

    let err = client(base_url, "wrong-key")
        .fetch_bars("AAPL", "2021-01-01", "2021-01-02")
        .await
        .unwrap_err();

    match err {
        IngestError::UpstreamStatus { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Unknown API Key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_bars_rejects_non_json_body() {
    let base_url = spawn_upstream().await;

    let err = client(format!("{}/broken", base_url), API_KEY)
        .fetch_bars("AAPL", "a", "b")
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Upstream(_)));
}

#[tokio::test]
async fn test_fetch_bars_network_failure() {
    // nothing listens on the discard port
    let err = client("http://127.0.0.1:9".to_string(), API_KEY)
        .fetch_bars("AAPL", "a", "b")
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Upstream(_)));
}
