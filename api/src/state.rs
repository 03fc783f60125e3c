use std::sync::Arc;

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use shared::{get_db_connection, Config, IngestService, PolygonApiClient};

#[derive(Clone)]
pub struct AppState {
    pub ingest_service: Arc<IngestService>,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let db = get_db_connection(&config.database_url).await?;
        Migrator::up(&db, None).await?;
        tracing::info!("Database schema is up to date");

        let client = PolygonApiClient::from_config(config)?;
        tracing::info!("Market data client ready: {:?}", client);

        let ingest_service = Arc::new(IngestService::new(
            Arc::new(db),
            Arc::new(client),
            config.timespan.clone(),
        ));

        Ok(AppState { ingest_service })
    }
}
