// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run-Leaderboard: running-club leaderboard backed by Notion
//!
//! This crate serves the web app's API: it reads member and run-record pages
//! from Notion, reshapes them into flat JSON, and writes new run records.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::NotionClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub notion: NotionClient,
}

impl AppState {
    /// Build state from configuration.
    pub fn new(config: Config) -> Result<Self, error::AppError> {
        let notion = NotionClient::new(&config)?;
        Ok(Self { config, notion })
    }
}
