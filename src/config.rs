// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. Missing required values fail fast
//! instead of surfacing on the first request.

use std::env;

/// Default Notion REST endpoint.
pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Notion ---
    /// Integration token, forwarded as a bearer credential
    pub notion_api_key: String,
    /// Base URL of the Notion API (overridable for tests)
    pub notion_api_url: String,
    /// Per-request timeout for Notion calls, in seconds
    pub notion_timeout_secs: u64,
    /// Upper bound on search/query batches in one pagination loop
    pub max_search_batches: u32,

    // --- Databases ---
    /// Member database (leaderboard and member list)
    pub member_data_source_id: String,
    /// Run-record data source (duplicate check and page creation)
    pub records_data_source_id: String,
    /// Run-record database id as it appears in `parent.database_id`, dashes removed
    pub records_database_id: String,

    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            notion_api_key: "test_notion_key".to_string(),
            notion_api_url: DEFAULT_NOTION_API_URL.to_string(),
            notion_timeout_secs: 10,
            max_search_batches: 50,
            member_data_source_id: "member-db".to_string(),
            records_data_source_id: "records-db".to_string(),
            records_database_id: "recordsdb".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let records_data_source_id = required("DATA_SOURCE_ID")?;
        let records_database_id = optional("MULTI_DATA_SOURCE_ID")
            .unwrap_or_else(|| records_data_source_id.clone());

        Ok(Self {
            notion_api_key: required("NOTION_API_KEY")?,
            notion_api_url: optional("NOTION_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_NOTION_API_URL.to_string()),
            notion_timeout_secs: parsed("NOTION_TIMEOUT_SECS", 10)?,
            max_search_batches: parsed("NOTION_MAX_SEARCH_BATCHES", 50)?,
            member_data_source_id: required("MEMBER_DATA_SOURCE_ID")?,
            records_database_id: strip_dashes(&records_database_id),
            records_data_source_id,
            port: parsed("PORT", 8080)?,
        })
    }
}

/// Notion reports database ids both with and without dashes.
pub fn strip_dashes(id: &str) -> String {
    id.replace('-', "")
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name, raw)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
