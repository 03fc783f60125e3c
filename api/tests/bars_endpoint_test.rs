//! Router-level tests for `/bars/{ticker}/{start}/{end}` and `/health`

use std::sync::Arc;

use api::{app, AppState};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use migration::{Migrator, MigratorTrait};
use serde_json::{json, Value};
use shared::repositories::{candle_repository, ticker_repository};
use shared::{get_db_connection, IngestError, IngestService, MarketDataSource};
use tower::ServiceExt;

const DAY_MS: i64 = 86_400_000;
const JAN_4_2021: i64 = 1_609_736_400_000;

struct FixedSource(Result<Value, u16>);

#[async_trait]
impl MarketDataSource for FixedSource {
    async fn fetch_bars(&self, _ticker: &str, _start: &str, _end: &str) -> Result<Value, IngestError> {
        match &self.0 {
            Ok(body) => Ok(body.clone()),
            Err(status) => Err(IngestError::UpstreamStatus {
                status: *status,
                body: "unauthorized".to_string(),
            }),
        }
    }
}

fn make_response(count: usize) -> Value {
    let results: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "o": 10.0, "c": 11.0, "h": 12.0, "l": 9.0,
                "v": 1000, "vw": 10.5,
                "t": JAN_4_2021 + i as i64 * DAY_MS
            })
        })
        .collect();
    json!({"ticker": "AAPL", "resultsCount": count, "results": results, "status": "OK"})
}

async fn setup(reply: Result<Value, u16>) -> (Router, Arc<IngestService>) {
    let db = get_db_connection("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let ingest_service = Arc::new(IngestService::new(
        Arc::new(db),
        Arc::new(FixedSource(reply)),
        "day".to_string(),
    ));
    let state = AppState {
        ingest_service: ingest_service.clone(),
    };
    (app(state), ingest_service)
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let (router, _) = setup(Ok(json!({}))).await;

    let (status, body) = get_json(router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_bars_endpoint_returns_upstream_body_and_persists() {
    let upstream = make_response(30);
    let (router, service) = setup(Ok(upstream.clone())).await;

    let (status, body) = get_json(router, "/bars/AAPL/2021-01-01/2021-01-02").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, upstream);
    assert_eq!(body["results"].as_array().unwrap().len(), 30);
    assert_eq!(candle_repository::count_candles(service.db(), "AAPL").await.unwrap(), 30);
    assert!(ticker_repository::find_ticker(service.db(), "AAPL").await.unwrap().is_some());
}

#[tokio::test]
async fn test_bars_endpoint_twice_does_not_duplicate() {
    let (router, service) = setup(Ok(make_response(8))).await;

    get_json(router.clone(), "/bars/aapl/2021-01-01/2021-01-09").await;
    let (status, _) = get_json(router, "/bars/aapl/2021-01-01/2021-01-09").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(candle_repository::count_candles(service.db(), "AAPL").await.unwrap(), 8);
}

#[tokio::test]
async fn test_upstream_status_is_propagated() {
    let (router, service) = setup(Err(401)).await;

    let (status, body) = get_json(router, "/bars/AAPL/2021-01-01/2021-01-02").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("401"));
    assert!(ticker_repository::find_ticker(service.db(), "AAPL").await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_upstream_is_bad_gateway() {
    let (router, _) = setup(Ok(json!({"results": {"o": 1}}))).await;

    let (status, body) = get_json(router, "/bars/AAPL/2021-01-01/2021-01-02").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().starts_with("malformed upstream response"));
}
