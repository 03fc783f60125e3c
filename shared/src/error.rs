use sea_orm::DbErr;
use thiserror::Error;

/// Failures surfaced by an ingestion call.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Network failure or an undecodable body from the market-data API.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}
