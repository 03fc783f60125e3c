use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use anyhow::Result;
use log::LevelFilter;
use tracing::info;

pub async fn get_db_connection(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database via Sea-ORM at: {}", database_url);
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);
    if database_url.starts_with("sqlite") {
        // an in-memory database exists per connection
        options.max_connections(1);
    }
    let db = Database::connect(options).await?;
    Ok(db)
}
