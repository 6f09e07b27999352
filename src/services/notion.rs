// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notion API client.
//!
//! Handles:
//! - Database queries (filtered, sorted, paginated)
//! - Workspace search for pages
//! - Single page reads
//! - Page creation
//! - Rate limit detection (so pagination can stop early)

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Page, PageList};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// API version pinned on every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Largest page size Notion accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Notion API client.
#[derive(Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NotionClient {
    /// Create a client with the configured credential, endpoint and timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.notion_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.notion_api_url.clone(),
            api_key: config.notion_api_key.clone(),
        })
    }

    /// Query a database.
    ///
    /// POST /databases/{id}/query
    pub async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<PageList, AppError> {
        let url = format!(
            "{}/databases/{}/query",
            self.base_url,
            urlencoding::encode(database_id)
        );
        self.post_json(&url, query).await
    }

    /// Search the workspace for pages, newest edits first or last.
    ///
    /// POST /search
    pub async fn search_pages(&self, query: &SearchQuery) -> Result<PageList, AppError> {
        let url = format!("{}/search", self.base_url);
        self.post_json(&url, query).await
    }

    /// Read a single page with all of its properties.
    ///
    /// GET /pages/{id}
    pub async fn read_page(&self, page_id: &str) -> Result<Page, AppError> {
        let url = format!("{}/pages/{}", self.base_url, urlencoding::encode(page_id));

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
            .map_err(transport_error)?;

        self.check_response_json(response).await
    }

    /// Create a page under `parent` with the given typed properties.
    ///
    /// POST /pages
    pub async fn create_page(
        &self,
        parent: &PageParent,
        properties: Value,
    ) -> Result<CreatedPage, AppError> {
        let url = format!("{}/pages", self.base_url);
        let body = serde_json::json!({
            "parent": parent,
            "properties": properties,
        });
        self.post_json(&url, &body).await
    }

    /// Generic POST request with JSON body and response.
    async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &text));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Notion JSON parse error: {}", e)))
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    AppError::Internal(anyhow::anyhow!("Notion request failed: {}", e))
}

/// Build an error from a non-2xx Notion response.
///
/// Notion error bodies look like `{"object":"error","status":429,"code":...,"message":...}`.
fn api_error(status: u16, text: &str) -> AppError {
    let body: Option<Value> = serde_json::from_str(text).ok();
    let message = body
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}: {}", status, text));
    let body_status = body
        .as_ref()
        .and_then(|b| b.get("status"))
        .and_then(Value::as_u64);

    if status == 429 || body_status == Some(429) {
        tracing::warn!("Notion rate limit hit (429)");
        return AppError::RateLimited { message };
    }

    AppError::NotionApi {
        status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
        message,
        body,
    }
}

// ─── Request / Response Shapes ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort on a database property.
#[derive(Debug, Clone, Serialize)]
pub struct PropertySort {
    pub property: String,
    pub direction: SortDirection,
}

/// Body of a database query.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<PropertySort>,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

impl Default for DatabaseQuery {
    fn default() -> Self {
        Self {
            filter: None,
            sorts: Vec::new(),
            page_size: MAX_PAGE_SIZE,
            start_cursor: None,
        }
    }
}

/// Search restricted to page objects.
#[derive(Debug, Clone, Serialize)]
pub struct SearchFilter {
    pub property: &'static str,
    pub value: &'static str,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            property: "object",
            value: "page",
        }
    }
}

/// Search ordering by edit time.
#[derive(Debug, Clone, Serialize)]
pub struct TimestampSort {
    pub timestamp: &'static str,
    pub direction: SortDirection,
}

/// Body of a workspace search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    pub filter: SearchFilter,
    pub sort: TimestampSort,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

impl SearchQuery {
    /// Pages ordered by most recent edit.
    pub fn recently_edited(page_size: u32, start_cursor: Option<String>) -> Self {
        Self {
            filter: SearchFilter::default(),
            sort: TimestampSort {
                timestamp: "last_edited_time",
                direction: SortDirection::Descending,
            },
            page_size: page_size.min(MAX_PAGE_SIZE),
            start_cursor,
        }
    }
}

/// Parent of a page being created.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageParent {
    DataSourceId { data_source_id: String },
    DatabaseId { database_id: String },
}

/// The parts of a created page this service uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedPage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_rate_limit_by_status() {
        let err = api_error(429, r#"{"object":"error","status":429,"message":"Slow down"}"#);
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "Slow down");
    }

    #[test]
    fn test_api_error_rate_limit_by_body() {
        let err = api_error(400, r#"{"object":"error","status":429,"message":"limited"}"#);
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_api_error_keeps_status_and_body() {
        let err = api_error(
            404,
            r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find database"}"#,
        );
        match err {
            AppError::NotionApi {
                status,
                message,
                body,
            } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Could not find database");
                assert_eq!(body.unwrap()["code"], "object_not_found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_non_json_body() {
        let err = api_error(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_search_query_body() {
        let query = SearchQuery::recently_edited(500, Some("abc".into()));
        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({
                "filter": { "property": "object", "value": "page" },
                "sort": { "timestamp": "last_edited_time", "direction": "descending" },
                "page_size": 100,
                "start_cursor": "abc"
            })
        );
    }

    #[test]
    fn test_database_query_skips_empty_fields() {
        let query = DatabaseQuery {
            sorts: vec![PropertySort {
                property: "Name".into(),
                direction: SortDirection::Ascending,
            }],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({
                "sorts": [{ "property": "Name", "direction": "ascending" }],
                "page_size": 100
            })
        );
    }

    #[test]
    fn test_page_parent_shape() {
        let parent = PageParent::DataSourceId {
            data_source_id: "ds-1".into(),
        };
        assert_eq!(
            serde_json::to_value(parent).unwrap(),
            json!({ "type": "data_source_id", "data_source_id": "ds-1" })
        );
    }
}
