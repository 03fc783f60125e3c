//! `SeaORM` entities for the ingestion tables

pub mod aggregate_candles;
pub mod tickers;
