use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::IngestError;

/// Source of raw aggregate bar responses.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_bars(&self, ticker: &str, start: &str, end: &str) -> Result<Value, IngestError>;
}

#[derive(Clone)]
pub struct PolygonApiClient {
    client: reqwest::Client,
    pub base_url: String,
    api_key: String,
    pub multiplier: u32,
    pub timespan: String,
}

impl PolygonApiClient {
    pub fn new(
        base_url: String,
        api_key: String,
        multiplier: u32,
        timespan: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            multiplier,
            timespan,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        match config.transport.as_str() {
            "reqwest" => {}
            other => bail!("unsupported TRANSPORT {:?}, only \"reqwest\" is available", other),
        }

        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.multiplier,
            config.timespan.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// `/v2/aggs/ticker/{ticker}/range/{multiplier}/{timespan}/{from}/{to}`
    pub fn aggregates_url(&self, ticker: &str, start: &str, end: &str) -> String {
        format!(
            "{}/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
            self.base_url, ticker, self.multiplier, self.timespan, start, end
        )
    }
}

impl fmt::Debug for PolygonApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolygonApiClient")
            .field("base_url", &self.base_url)
            .field("multiplier", &self.multiplier)
            .field("timespan", &self.timespan)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MarketDataSource for PolygonApiClient {
    async fn fetch_bars(&self, ticker: &str, start: &str, end: &str) -> Result<Value, IngestError> {
        let url = self.aggregates_url(ticker, start, end);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        info!("Polygon aggregates for {} responded with {}", ticker, status);
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read Polygon error body for {}: {}", ticker, e);
                    String::new()
                }
            };
            return Err(IngestError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        Ok(body)
    }
}
