// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run-record endpoints: per-member history, latest feed, and saving.

use crate::error::{AppError, Result};
use crate::middleware::{gate, Endpoint};
use crate::models::{NewRunRecord, RunRecord};
use crate::routes::function_path;
use crate::services::records::{latest_records, member_records};
use crate::services::RecordWriter;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    middleware,
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Record routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &function_path("get-member-records"),
            any(get_member_records).layer(middleware::from_fn_with_state(Endpoint::GET, gate)),
        )
        .route(
            &function_path("get-today-records"),
            any(get_today_records).layer(middleware::from_fn_with_state(Endpoint::GET, gate)),
        )
        .route(
            &function_path("save-to-notion"),
            any(save_to_notion).layer(middleware::from_fn_with_state(Endpoint::POST, gate)),
        )
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecordsResponse {
    pub records: Vec<RunRecord>,
    pub total: usize,
}

impl From<Vec<RunRecord>> for RecordsResponse {
    fn from(records: Vec<RunRecord>) -> Self {
        Self {
            total: records.len(),
            records,
        }
    }
}

// ─── Member History ──────────────────────────────────────────

#[derive(Deserialize)]
struct MemberRecordsQuery {
    #[serde(rename = "memberId")]
    member_id: Option<String>,
}

/// Every dated record of one member, newest first.
async fn get_member_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MemberRecordsQuery>,
) -> Result<Json<RecordsResponse>> {
    let member_id = params
        .member_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("memberId is required".to_string()))?;

    tracing::info!(member_id = %member_id, "Searching records for member");

    let records = member_records(
        &state.notion,
        &state.config.records_database_id,
        &member_id,
        state.config.max_search_batches,
    )
    .await
    .map_err(|e| e.describe("Failed to load member records"))?;

    Ok(Json(records.into()))
}

// ─── Latest Feed ─────────────────────────────────────────────

/// The most recently edited records across the club.
async fn get_today_records(State(state): State<Arc<AppState>>) -> Result<Json<RecordsResponse>> {
    let records = latest_records(&state.notion, &state.config.records_database_id)
        .await
        .map_err(|e| e.describe("Failed to load records"))?;

    Ok(Json(records.into()))
}

// ─── Save ────────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Create a run record, refusing a second record for the same member and day.
async fn save_to_notion(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SaveResponse>> {
    let record: NewRunRecord = serde_json::from_slice(&body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid request body: {}", e)))?;

    record
        .validate()
        .map_err(|errors| AppError::BadRequest(validation_message(&errors)))?;

    let created = RecordWriter::new(&state.notion, &state.config.records_data_source_id)
        .save(&record)
        .await?;

    Ok(Json(SaveResponse {
        success: true,
        url: created.url,
    }))
}

/// Flatten validator output into one sentence, in a stable order.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect();
    messages.sort();
    messages.join(", ")
}
