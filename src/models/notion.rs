// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notion page and property shapes.
//!
//! Pages are decoded leniently: the page envelope keeps its properties as raw
//! JSON, and each property is decoded on access into [`PropertyValue`]. A
//! property that is missing or has an unexpected shape reads as empty, so
//! mapping a page into a domain record can never fail.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One Notion page (a database row).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub parent: Option<Parent>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Where a page lives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parent {
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default)]
    pub data_source_id: Option<String>,
}

/// Paginated list envelope shared by `/search` and `/databases/{id}/query`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageList {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl PageList {
    /// Decode every result that looks like a page; anything else is skipped.
    pub fn pages(&self) -> Vec<Page> {
        self.results.iter().filter_map(Page::from_value).collect()
    }
}

/// Typed view of a single property value.
///
/// Only the variants this service reads are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyValue {
    #[serde(default)]
    pub title: Option<Vec<RichText>>,
    #[serde(default)]
    pub rich_text: Option<Vec<RichText>>,
    #[serde(default)]
    pub date: Option<DateValue>,
    #[serde(default)]
    pub number: Option<f64>,
    #[serde(default)]
    pub relation: Option<Vec<RelationRef>>,
    #[serde(default)]
    pub select: Option<SelectOption>,
    #[serde(default)]
    pub rollup: Option<Rollup>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RichText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TextContent {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DateValue {
    #[serde(default)]
    pub start: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RelationRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rollup {
    #[serde(default)]
    pub number: Option<f64>,
}

impl RichText {
    /// A plain run of text, the shape Notion expects on writes.
    pub fn plain(content: &str) -> Self {
        Self {
            text: Some(TextContent {
                content: content.to_string(),
            }),
            plain_text: None,
        }
    }

    fn content(&self) -> Option<&str> {
        self.text
            .as_ref()
            .map(|t| t.content.as_str())
            .or(self.plain_text.as_deref())
    }
}

impl Page {
    /// Decode a raw search/query result, skipping anything without an id.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Parent database id with dashes removed.
    pub fn parent_database_id(&self) -> Option<String> {
        self.parent
            .as_ref()
            .and_then(|p| p.database_id.as_deref())
            .map(crate::config::strip_dashes)
    }

    /// Decode one property. Missing or malformed properties read as empty.
    pub fn property(&self, name: &str) -> PropertyValue {
        self.properties
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// First run of a title property.
    pub fn title_text(&self, name: &str) -> Option<String> {
        first_run(self.property(name).title)
    }

    /// First run of a rich-text property.
    pub fn rich_text(&self, name: &str) -> Option<String> {
        first_run(self.property(name).rich_text)
    }

    /// Start of a date property, if non-empty.
    pub fn date_start(&self, name: &str) -> Option<String> {
        self.property(name)
            .date
            .and_then(|d| d.start)
            .filter(|s| !s.is_empty())
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.property(name).number
    }

    /// Numeric result of a rollup property.
    pub fn rollup_number(&self, name: &str) -> Option<f64> {
        self.property(name).rollup.and_then(|r| r.number)
    }

    pub fn select_name(&self, name: &str) -> Option<String> {
        self.property(name).select.and_then(|s| s.name)
    }

    /// First related page id of a relation property.
    pub fn first_relation_id(&self, name: &str) -> Option<String> {
        self.property(name)
            .relation
            .and_then(|r| r.into_iter().next())
            .map(|r| r.id)
    }
}

fn first_run(runs: Option<Vec<RichText>>) -> Option<String> {
    runs.as_deref()
        .and_then(|r| r.first())
        .and_then(RichText::content)
        .map(str::to_string)
}

/// Convert a Notion number into a non-negative whole count.
pub fn whole_number(value: Option<f64>) -> u32 {
    match value {
        Some(n) if n.is_finite() && n > 0.0 => n.round().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}
