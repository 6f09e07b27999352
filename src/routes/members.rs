// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member endpoints: leaderboard and member list.

use crate::error::Result;
use crate::middleware::{gate, Endpoint};
use crate::models::{LeaderboardEntry, MemberSummary};
use crate::routes::function_path;
use crate::services::members::{fetch_members, member_list, rank_leaderboard};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{extract::State, middleware, routing::any, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Member routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &function_path("get-leaderboard"),
            any(get_leaderboard).layer(middleware::from_fn_with_state(Endpoint::GET, gate)),
        )
        .route(
            &function_path("get-members"),
            any(get_members).layer(middleware::from_fn_with_state(Endpoint::GET, gate)),
        )
}

// ─── Leaderboard ─────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Number of ranked members (members with no runs are not counted)
    pub total_members: usize,
    pub updated_at: String,
}

/// Ranked members by cumulative run count.
async fn get_leaderboard(State(state): State<Arc<AppState>>) -> Result<Json<LeaderboardResponse>> {
    let members = fetch_members(
        &state.notion,
        &state.config.member_data_source_id,
        false,
        state.config.max_search_batches,
    )
    .await
    .map_err(|e| e.describe("Failed to load leaderboard data"))?;

    let fetched = members.len();
    let leaderboard = rank_leaderboard(members);
    tracing::debug!(fetched, ranked = leaderboard.len(), "Leaderboard built");

    Ok(Json(LeaderboardResponse {
        total_members: leaderboard.len(),
        leaderboard,
        updated_at: format_utc_rfc3339(chrono::Utc::now()),
    }))
}

// ─── Member List ─────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MembersResponse {
    pub members: Vec<MemberSummary>,
    pub count: usize,
}

/// All members, sorted by name in Notion, for the record form's member picker.
async fn get_members(State(state): State<Arc<AppState>>) -> Result<Json<MembersResponse>> {
    let members = fetch_members(
        &state.notion,
        &state.config.member_data_source_id,
        true,
        state.config.max_search_batches,
    )
    .await
    .map_err(|e| e.describe("Failed to fetch members"))?;

    let members = member_list(members);
    Ok(Json(MembersResponse {
        count: members.len(),
        members,
    }))
}
