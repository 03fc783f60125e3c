use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /bars/{ticker}/{start}/{end}`: ingest the range and echo the upstream body.
pub async fn get_aggregate_bars(
    State(state): State<AppState>,
    Path((ticker, start, end)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    let response = state.ingest_service.ingest(&ticker, &start, &end).await?;
    Ok(Json(response))
}
