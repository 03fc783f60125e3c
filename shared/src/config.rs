use anyhow::{bail, Context};
use dotenv::dotenv;
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./polygon_io.db?mode=rwc";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub api_key: String,
    pub transport: String,
    pub base_url: String,
    pub multiplier: u32,
    pub timespan: String,
    pub bind_addr: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = var("API_KEY").context("API_KEY must be set")?;

        let multiplier: u32 = match var("MULTIPLIER") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("MULTIPLIER must be a positive integer, got {raw:?}"))?,
            None => 1,
        };
        if multiplier == 0 {
            bail!("MULTIPLIER must be a positive integer, got 0");
        }

        let request_timeout_secs: u64 = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS must be a number of seconds, got {raw:?}"))?,
            None => 30,
        };

        Ok(Config {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            api_key,
            transport: var("TRANSPORT").unwrap_or_else(|| "reqwest".to_string()),
            base_url: var("BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            multiplier,
            timespan: var("TIMESPAN").unwrap_or_else(|| "day".to_string()),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:9999".to_string()),
            request_timeout_secs,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("api_key", &"<redacted>")
            .field("transport", &self.transport)
            .field("base_url", &self.base_url)
            .field("multiplier", &self.multiplier)
            .field("timespan", &self.timespan)
            .field("bind_addr", &self.bind_addr)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
