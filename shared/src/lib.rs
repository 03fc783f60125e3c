pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod models;
pub mod polygon;
pub mod repositories;
pub mod services;

pub use config::Config;
pub use database::get_db_connection;
pub use error::IngestError;
pub use models::*;
pub use polygon::{MarketDataSource, PolygonApiClient};
pub use services::{IngestReport, IngestService};
