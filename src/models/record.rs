// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run record model: the flat read shape and the write request.

use crate::models::notion::{whole_number, Page, RelationRef, RichText};
use crate::models::schema::record as props;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One run, flattened from a record page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub id: String,
    /// Related member page id, sent as `name` (only on the latest-records feed)
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub title: String,
    /// ISO 8601 date or date-time
    pub date: String,
    /// Minutes run
    pub duration: u32,
    pub location: String,
    pub before: String,
    pub during: String,
    pub after: String,
}

impl RunRecord {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            member_id: None,
            title: page.title_text(props::TITLE).unwrap_or_default(),
            date: page.date_start(props::DATE).unwrap_or_default(),
            duration: whole_number(page.number(props::DURATION)),
            location: page.rich_text(props::LOCATION).unwrap_or_default(),
            before: page.rich_text(props::BEFORE).unwrap_or_default(),
            during: page.rich_text(props::DURING).unwrap_or_default(),
            after: page.rich_text(props::AFTER).unwrap_or_default(),
        }
    }

    /// Same as [`RunRecord::from_page`], keeping the member relation.
    pub fn from_page_with_member(page: &Page) -> Self {
        Self {
            member_id: Some(page.first_relation_id(props::MEMBER).unwrap_or_default()),
            ..Self::from_page(page)
        }
    }
}

/// Whether a record page has been filled in far enough to show.
pub fn has_date(page: &Page) -> bool {
    page.date_start(props::DATE).is_some()
}

/// Related member id of a record page.
pub fn member_of(page: &Page) -> Option<String> {
    page.first_relation_id(props::MEMBER)
}

/// Body of a save request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRunRecord {
    #[serde(default)]
    #[validate(length(min = 1, message = "memberId is required"))]
    pub member_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "date is required"))]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub duration: u32,
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub during: String,
    #[serde(default)]
    pub after: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Skip the same-day duplicate check
    #[serde(default)]
    pub force: bool,
}

impl NewRunRecord {
    /// Notion `properties` object for page creation.
    pub fn to_properties(&self) -> Value {
        let mut properties = Map::new();
        properties.insert(
            props::TITLE.to_string(),
            json!({ "title": [RichText::plain(&self.title)] }),
        );
        let member = RelationRef {
            id: self.member_id.clone(),
        };
        properties.insert(
            props::MEMBER.to_string(),
            json!({ "relation": [member] }),
        );
        properties.insert(
            props::DATE.to_string(),
            json!({ "date": { "start": self.date } }),
        );
        properties.insert(
            props::DURATION.to_string(),
            json!({ "number": self.duration }),
        );
        for (name, text) in [
            (props::BEFORE, &self.before),
            (props::DURING, &self.during),
            (props::AFTER, &self.after),
        ] {
            properties.insert(
                name.to_string(),
                json!({ "rich_text": [RichText::plain(text)] }),
            );
        }
        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            properties.insert(
                props::LOCATION.to_string(),
                json!({ "rich_text": [RichText::plain(location)] }),
            );
        }
        Value::Object(properties)
    }

    /// Database query filter matching an existing record for the same member and day.
    pub fn duplicate_filter(&self) -> Value {
        json!({
            "and": [
                { "property": props::MEMBER, "relation": { "contains": self.member_id } },
                { "property": props::DATE, "date": { "equals": self.date } }
            ]
        })
    }
}

/// Accept minutes as a JSON number or a numeric string such as `"45"` or `"45 min"`.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let minutes = match value {
        Value::Number(n) => n.as_f64().map(f64::trunc),
        Value::String(s) => leading_integer(&s),
        _ => None,
    };
    Ok(whole_number(minutes))
}

fn leading_integer(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<f64>().ok().map(|n| sign * n)
}
