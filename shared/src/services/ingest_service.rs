//! Fetch aggregate bars from the market-data source and persist the ones not stored yet

use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::Value;
use tracing::info;

use crate::entity::aggregate_candles::NewCandle;
use crate::error::IngestError;
use crate::models::parse_bars;
use crate::polygon::MarketDataSource;
use crate::repositories::{candle_repository, ticker_repository};

/// Outcome of one ingestion, alongside the untouched upstream body.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub symbol: String,
    pub received: usize,
    pub inserted: u64,
    pub response: Value,
}

impl IngestReport {
    pub fn skipped(&self) -> u64 {
        (self.received as u64).saturating_sub(self.inserted)
    }
}

pub struct IngestService {
    db: Arc<DatabaseConnection>,
    source: Arc<dyn MarketDataSource>,
    timespan: String,
}

impl IngestService {
    pub fn new(db: Arc<DatabaseConnection>, source: Arc<dyn MarketDataSource>, timespan: String) -> Self {
        Self { db, source, timespan }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Runs one ingestion and returns the raw upstream response.
    pub async fn ingest(&self, ticker: &str, start: &str, end: &str) -> Result<Value, IngestError> {
        Ok(self.ingest_with_report(ticker, start, end).await?.response)
    }

    pub async fn ingest_with_report(
        &self,
        ticker: &str,
        start: &str,
        end: &str,
    ) -> Result<IngestReport, IngestError> {
        let response = self.source.fetch_bars(ticker, start, end).await?;
        let bars = parse_bars(&response)?;

        let txn = self.db.begin().await?;

        let ticker_row = ticker_repository::find_or_create_ticker(&txn, ticker).await?;

        let times: Vec<i64> = bars.iter().map(|bar| bar.timestamp).collect();
        let existing =
            candle_repository::existing_times(&txn, &ticker_row.symbol, &self.timespan, &times).await?;

        // `seen` also collapses repeated timestamps inside a single response
        let mut seen: HashSet<i64> = existing;
        let staged: Vec<NewCandle> = bars
            .iter()
            .filter(|bar| seen.insert(bar.timestamp))
            .map(|bar| bar.to_candle(&ticker_row.symbol, &self.timespan))
            .collect();

        let inserted = if staged.is_empty() {
            0
        } else {
            candle_repository::insert_candles(&txn, &staged).await?
        };

        txn.commit().await?;

        let report = IngestReport {
            symbol: ticker_row.symbol,
            received: bars.len(),
            inserted,
            response,
        };
        info!(
            "Ingested {} {}..{}: received={} inserted={} skipped={}",
            report.symbol,
            start,
            end,
            report.received,
            report.inserted,
            report.skipped()
        );
        Ok(report)
    }
}
