use crate::errors::SyncError;
use std::env;

/// Listing pages to monitor. Add more circuits here as needed.
pub const CIRCUIT_URLS: &[&str] = &["https://letzplay.me/circuitobeachtennis/tourneys"];

pub struct Config {
    pub notion_token: String,
    pub notion_db_id: String,
    pub circuit_urls: Vec<String>,
}

impl Config {
    /// Read required secrets from the environment. Missing or empty values
    /// are fatal before any network activity happens.
    pub fn from_env() -> Result<Self, SyncError> {
        let notion_token = require_env("NOTION_TOKEN")?;
        let notion_db_id = require_env("NOTION_DB_ID")?;

        Ok(Self {
            notion_token,
            notion_db_id,
            circuit_urls: CIRCUIT_URLS.iter().map(|s| s.to_string()).collect(),
        })
    }
}

fn require_env(name: &'static str) -> Result<String, SyncError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SyncError::MissingConfig(name)),
    }
}
