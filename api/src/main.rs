use anyhow::Result;
use api::{app, AppState};
use shared::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Polygon bars API server...");

    let config = Config::from_env()?;
    info!("Loaded configuration: {:?}", config);

    let state = AppState::new(&config).await?;
    info!("Connected to database");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("API server listening on http://{}", config.bind_addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
