// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Club member model and its API projections.

use crate::models::notion::{whole_number, Page};
use crate::models::schema::member as props;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Name shown for a member page whose title is empty.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A member row, with rollups already computed by Notion.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Notion page id
    pub id: String,
    pub name: String,
    pub group: String,
    /// Main activity area
    pub location: String,
    /// Cohort the member joined with
    pub generation: String,
    /// Cumulative number of runs
    pub run_count: u32,
    /// Cumulative running time in minutes
    pub run_minutes: u32,
}

impl Member {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: page
                .title_text(props::NAME)
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            group: page.select_name(props::GROUP).unwrap_or_default(),
            location: page.select_name(props::LOCATION).unwrap_or_default(),
            generation: page.select_name(props::GENERATION).unwrap_or_default(),
            run_count: whole_number(page.rollup_number(props::RUN_COUNT)),
            run_minutes: whole_number(page.rollup_number(props::RUN_MINUTES)),
        }
    }
}

/// Leaderboard row.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub count: u32,
    pub total_time: u32,
    pub group: String,
    pub location: String,
    pub generation: String,
    pub id: String,
}

impl From<Member> for LeaderboardEntry {
    fn from(m: Member) -> Self {
        Self {
            name: m.name,
            count: m.run_count,
            total_time: m.run_minutes,
            group: m.group,
            location: m.location,
            generation: m.generation,
            id: m.id,
        }
    }
}

/// Member picker row.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MemberSummary {
    pub id: String,
    pub name: String,
    pub group: String,
    pub location: String,
}

impl From<Member> for MemberSummary {
    fn from(m: Member) -> Self {
        Self {
            id: m.id,
            name: m.name,
            group: m.group,
            location: m.location,
        }
    }
}
