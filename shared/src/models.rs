use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::entity::aggregate_candles::NewCandle;
use crate::error::IngestError;

/// One aggregate bar as returned in the `results` array of the Polygon aggregates endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "v")]
    pub volume: f64,
    #[serde(rename = "vw", default)]
    pub vwap: Option<f64>,
    #[serde(rename = "t", deserialize_with = "deserialize_millis")]
    pub timestamp: i64,
}

/// Accepts integer or float epoch milliseconds; floats are rounded like `v`.
fn deserialize_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(ms) = number.as_i64() {
        return Ok(ms);
    }
    match number.as_f64() {
        Some(ms) if ms.is_finite() && ms.abs() < i64::MAX as f64 => Ok(ms.round() as i64),
        _ => Err(serde::de::Error::custom(format!(
            "timestamp {} is not representable as epoch milliseconds",
            number
        ))),
    }
}

impl Bar {
    pub fn to_candle(&self, ticker_id: &str, timespan: &str) -> NewCandle {
        NewCandle {
            ticker_id: ticker_id.to_string(),
            open_price: self.open,
            close_price: self.close,
            high_price: self.high,
            low_price: self.low,
            volume: self.volume.round() as i64,
            vwap: self.vwap,
            time: self.timestamp,
            timespan: timespan.to_string(),
        }
    }
}

/// Extracts the bars from a raw aggregates response.
///
/// A missing or `null` `results` field yields no bars.
pub fn parse_bars(response: &Value) -> Result<Vec<Bar>, IngestError> {
    match response.get("results") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(results @ Value::Array(_)) => Vec::<Bar>::deserialize(results)
            .map_err(|e| IngestError::MalformedResponse(format!("invalid bar in results: {}", e))),
        Some(other) => Err(IngestError::MalformedResponse(format!(
            "results must be an array, got {}",
            other
        ))),
    }
}
